use crate::http::Method;
use crate::http::headers::Headers;
use crate::http::parser::ParseState;

/// `METHOD TARGET HTTP/VERSION`, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    /// Version without the `HTTP/` prefix, e.g. `1.1`.
    pub http_version: String,
}

/// A request being assembled by [`Request::advance`].
///
/// Only the parser mutates it. Once [`is_done`](Request::is_done) returns
/// `true` it is handed over to the handler and only read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub(crate) request_line: Option<RequestLine>,
    pub(crate) headers: Headers,
    pub(crate) body: Vec<u8>,
    pub(crate) state: ParseState,
}

impl Request {
    pub fn new() -> Self {
        Self {
            request_line: None,
            headers: Headers::new(),
            body: Vec::new(),
            state: ParseState::RequestLine,
        }
    }

    /// Present once the parser moved past [`ParseState::RequestLine`].
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    pub fn method(&self) -> Option<Method> {
        self.request_line.as_ref().map(|rl| rl.method)
    }

    pub fn target(&self) -> Option<&str> {
        self.request_line.as_ref().map(|rl| rl.target.as_str())
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
