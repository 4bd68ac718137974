//! Incremental request parser.
//!
//! [`Request::advance`] is fed the bytes buffered so far and reports how many
//! of them it consumed. It never looks past what it was given: when a phase
//! needs more input it consumes nothing and the caller reads again (see
//! [`reader`](crate::http::reader)).
//!
//! Phases run strictly in order, request-line, then headers, then body, and
//! the state never moves backwards.

use thiserror::Error;

use crate::http::headers::{HeaderError, Headers, find_crlf};
use crate::http::request::{Request, RequestLine};
use crate::http::{CRLF, HTTP_VERSION, Method};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseState {
    RequestLine,
    Headers,
    Body,
    Done,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request-line")]
    MalformedRequestLine,

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("malformed HTTP version specification")]
    InvalidHttpVersion,

    #[error("unsupported HTTP version: {0}")]
    UnsupportedHttpVersion(String),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("content-length is not an integer")]
    InvalidContentLength,

    #[error("body length is greater than content-length")]
    BodyTooLong,
}

impl Request {
    /// Consumes as much of `buf` as the current phase can use.
    ///
    /// `Ok(0)` while not [`done`](Request::is_done) means more bytes are needed.
    /// Once done, every call is a no-op returning `Ok(0)`.
    pub fn advance(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::RequestLine => {
                let Some((request_line, consumed)) = parse_request_line(buf)? else {
                    return Ok(0);
                };
                self.request_line = Some(request_line);
                self.state = ParseState::Headers;
                Ok(consumed)
            }
            ParseState::Headers => {
                let (consumed, terminated) = self.headers.parse(buf)?;
                if terminated {
                    self.state = ParseState::Body;
                }
                Ok(consumed)
            }
            ParseState::Body => self.parse_body(buf),
            ParseState::Done => Ok(0),
        }
    }

    /// Takes every offered byte as body and checks the total afterwards.
    /// This is only sound because a connection carries a single request.
    fn parse_body(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let content_length = match declared_length(&self.headers)? {
            Some(n) => n,
            None => {
                self.state = ParseState::Done;
                return Ok(0);
            }
        };

        self.body.extend_from_slice(buf);

        if self.body.len() > content_length {
            return Err(ParseError::BodyTooLong);
        }
        if self.body.len() == content_length {
            self.state = ParseState::Done;
        }

        Ok(buf.len())
    }
}

fn declared_length(headers: &Headers) -> Result<Option<usize>, ParseError> {
    headers
        .content_length()
        .transpose()
        .map_err(|_| ParseError::InvalidContentLength)
}

/// Parses `METHOD TARGET HTTP/1.1\r\n` from the start of `buf`.
/// Returns `None` when the line is not complete yet.
fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(buf) else {
        return Ok(None);
    };

    // Method and version are matched against ASCII literals; only the target
    // can keep a replacement character.
    let line = String::from_utf8_lossy(&buf[..line_end]);

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method != method.to_uppercase() {
        return Err(ParseError::UnsupportedMethod(method.to_string()));
    }
    let method: Method = method
        .parse()
        .map_err(|_| ParseError::UnsupportedMethod(method.to_string()))?;

    let http_version = match version.split_once('/') {
        Some(("HTTP", v)) if !v.contains('/') => v,
        _ => return Err(ParseError::InvalidHttpVersion),
    };
    if http_version != HTTP_VERSION {
        return Err(ParseError::UnsupportedHttpVersion(http_version.to_string()));
    }

    let request_line = RequestLine {
        method,
        target: target.to_string(),
        http_version: http_version.to_string(),
    };

    Ok(Some((request_line, line_end + CRLF.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `data` to a fresh request the way the reader does, one
    /// `advance` per step, and returns the request.
    fn parse_all(data: &[u8]) -> Result<Request, ParseError> {
        let mut req = Request::new();
        let mut offset = 0;
        while !req.is_done() {
            let n = req.advance(&data[offset..])?;
            if n == 0 && !req.is_done() {
                break;
            }
            offset += n;
        }
        Ok(req)
    }

    #[test]
    fn parses_request_line() {
        let mut req = Request::new();
        let n = req.advance(b"GET /path HTTP/1.1\r\n").unwrap();
        assert_eq!(n, 20);
        assert_eq!(req.state(), ParseState::Headers);

        let rl = req.request_line().unwrap();
        assert_eq!(rl.method, Method::Get);
        assert_eq!(rl.target, "/path");
        assert_eq!(rl.http_version, "1.1");
    }

    #[test]
    fn incomplete_request_line_waits() {
        let mut req = Request::new();
        assert_eq!(req.advance(b"GET /path HTTP/1.1"), Ok(0));
        assert_eq!(req.advance(b""), Ok(0));
        assert_eq!(req.state(), ParseState::RequestLine);
        assert!(req.request_line().is_none());
    }

    #[test]
    fn rejects_lower_case_method() {
        let mut req = Request::new();
        let err = req.advance(b"get /path HTTP/1.1\r\n").unwrap_err();
        assert_eq!(err, ParseError::UnsupportedMethod("get".into()));
        assert_eq!(req.state(), ParseState::RequestLine);
    }

    #[test]
    fn rejects_unknown_method() {
        let mut req = Request::new();
        let err = req.advance(b"DELETE / HTTP/1.1\r\n").unwrap_err();
        assert_eq!(err, ParseError::UnsupportedMethod("DELETE".into()));
    }

    #[test]
    fn accepts_every_whitelisted_method() {
        for method in ["GET", "POST", "PUT", "PATCH", "UPDATE", "HEAD"] {
            let mut req = Request::new();
            let line = format!("{method} / HTTP/1.1\r\n");
            assert_eq!(req.advance(line.as_bytes()), Ok(line.len()));
            assert_eq!(req.method().unwrap().as_str(), method);
        }
    }

    #[test]
    fn rejects_wrong_part_count() {
        for line in [
            &b"/coffee HTTP/1.1\r\n"[..],
            b"GET  /coffee HTTP/1.1\r\n",
            b"GET /coffee HTTP/1.1 extra\r\n",
            b"\r\n",
        ] {
            let mut req = Request::new();
            assert_eq!(req.advance(line), Err(ParseError::MalformedRequestLine), "{line:?}");
        }
    }

    #[test]
    fn rejects_bad_versions() {
        let mut req = Request::new();
        assert_eq!(req.advance(b"GET / HTTPS/1.1\r\n"), Err(ParseError::InvalidHttpVersion));
        assert_eq!(req.advance(b"GET / 1.1\r\n"), Err(ParseError::InvalidHttpVersion));
        assert_eq!(req.advance(b"GET / HTTP/1/1\r\n"), Err(ParseError::InvalidHttpVersion));
        assert_eq!(
            req.advance(b"GET / HTTP/1.0\r\n"),
            Err(ParseError::UnsupportedHttpVersion("1.0".into()))
        );
        assert_eq!(
            req.advance(b"GET / HTTP/2\r\n"),
            Err(ParseError::UnsupportedHttpVersion("2".into()))
        );
    }

    #[test]
    fn non_utf8_target_is_accepted() {
        let mut req = Request::new();
        let line = b"GET /caf\xe9 HTTP/1.1\r\n";
        assert_eq!(req.advance(line), Ok(line.len()));
        assert_eq!(req.target(), Some("/caf\u{FFFD}"));
    }

    #[test]
    fn non_utf8_method_is_unsupported() {
        let mut req = Request::new();
        let err = req.advance(b"G\xc9T / HTTP/1.1\r\n").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedMethod(_)));
    }

    #[test]
    fn headers_phase_consumes_one_line_per_call() {
        let mut req = Request::new();
        let data = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\n\r\n";
        let mut offset = req.advance(data).unwrap();

        let n = req.advance(&data[offset..]).unwrap();
        assert_eq!(n, "Host: localhost:42069\r\n".len());
        assert_eq!(req.state(), ParseState::Headers);
        offset += n;

        offset += req.advance(&data[offset..]).unwrap();
        let n = req.advance(&data[offset..]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(req.state(), ParseState::Body);

        assert_eq!(req.headers().get("host"), Some("localhost:42069"));
        assert_eq!(req.headers().get("user-agent"), Some("curl/7.81.0"));
    }

    #[test]
    fn header_errors_propagate() {
        let err = parse_all(b"GET / HTTP/1.1\r\nHost localhost\r\n\r\n").unwrap_err();
        assert_eq!(err, ParseError::Header(HeaderError::MissingColon));
        assert_eq!(err.to_string(), "missing colon");
    }

    #[test]
    fn no_content_length_means_empty_body() {
        let req = parse_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\nignored").unwrap();
        assert!(req.is_done());
        assert!(req.body().is_empty());
    }

    #[test]
    fn zero_content_length_completes_without_bytes() {
        let mut req = parse_all(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();
        assert!(req.is_done());
        assert!(req.body().is_empty());
        assert_eq!(req.advance(b"more"), Ok(0));
    }

    #[test]
    fn reads_body_across_calls() {
        let mut req = parse_all(b"POST /submit HTTP/1.1\r\nContent-Length: 13\r\n\r\n").unwrap();
        assert_eq!(req.state(), ParseState::Body);

        assert_eq!(req.advance(b"hello "), Ok(6));
        assert_eq!(req.state(), ParseState::Body);
        assert_eq!(req.advance(b""), Ok(0));
        assert_eq!(req.advance(b"world!\n"), Ok(7));
        assert!(req.is_done());
        assert_eq!(req.body(), b"hello world!\n");
    }

    #[test]
    fn body_longer_than_content_length_fails() {
        let err = parse_all(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello world").unwrap_err();
        assert_eq!(err, ParseError::BodyTooLong);
    }

    #[test]
    fn non_numeric_content_length_fails() {
        for value in ["abc", "-1", "1.5", ""] {
            let data = format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\nbody");
            assert_eq!(parse_all(data.as_bytes()).unwrap_err(), ParseError::InvalidContentLength);
        }
    }

    #[test]
    fn state_only_moves_forward() {
        let data = b"PUT /x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let mut req = Request::new();
        let mut offset = 0;
        let mut last = req.state();
        while !req.is_done() {
            offset += req.advance(&data[offset..]).unwrap();
            assert!(req.state() >= last);
            last = req.state();
        }
        assert_eq!(offset, data.len());
    }
}
