//! Response serialization.
//!
//! There is no response object: a handler writes the status line, the
//! headers and the body straight to the connection, in that order. Nothing
//! is buffered or reordered, so calling the methods out of order puts a
//! malformed response on the wire.

use async_std::io::{Write, WriteExt};

use crate::http::headers::Headers;
use crate::http::status::StatusCode;
use crate::http::{CRLF, HTTP_VERSION};

/// Headers every response starts from: `content-length`, `connection: close`
/// and `content-type: text/plain`.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("content-length", content_len.to_string());
    headers.set("connection", "close");
    headers.set("content-type", "text/plain");
    headers
}

pub struct ResponseWriter<W> {
    conn: W,
}

impl<W> ResponseWriter<W>
where
    W: Write + Unpin,
{
    pub fn new(conn: W) -> Self {
        Self { conn }
    }

    /// `HTTP/1.1 <code> <reason>\r\n`
    pub async fn write_status_line(&mut self, status: StatusCode) -> std::io::Result<()> {
        let line = format!("HTTP/{} {}\r\n", HTTP_VERSION, status);
        self.conn.write_all(line.as_bytes()).await
    }

    /// `<name>: <value>\r\n` per entry followed by the empty line.
    pub async fn write_headers(&mut self, headers: &Headers) -> std::io::Result<()> {
        let mut block = String::new();
        for (name, value) in headers.iter() {
            block.push_str(&format!("{}: {}\r\n", name, value));
        }
        self.conn.write_all(block.as_bytes()).await?;
        self.conn.write_all(CRLF).await
    }

    pub async fn write_body(&mut self, body: &[u8]) -> std::io::Result<usize> {
        self.conn.write_all(body).await?;
        self.conn.flush().await?;
        Ok(body.len())
    }

    pub fn get_ref(&self) -> &W {
        &self.conn
    }

    pub fn into_inner(self) -> W {
        self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_header_set() {
        let headers = default_headers(42);
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(
            entries,
            [
                ("content-length", "42"),
                ("connection", "close"),
                ("content-type", "text/plain"),
            ]
        );
    }

    #[async_std::test]
    async fn writes_full_response() {
        let body = b"Hello World!\n";
        let mut headers = default_headers(body.len());
        headers.set("content-type", "text/html");

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::Ok).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        assert_eq!(writer.write_body(body).await.unwrap(), body.len());

        let wire = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\n\
             content-length: 13\r\n\
             connection: close\r\n\
             content-type: text/html\r\n\
             \r\n\
             Hello World!\n"
        );
    }

    #[async_std::test]
    async fn status_lines() {
        for (status, expected) in [
            (StatusCode::BadRequest, "HTTP/1.1 400 Bad Request\r\n"),
            (StatusCode::InternalServerError, "HTTP/1.1 500 Internal Server Error\r\n"),
        ] {
            let mut writer = ResponseWriter::new(Vec::new());
            writer.write_status_line(status).await.unwrap();
            assert_eq!(writer.get_ref().as_slice(), expected.as_bytes());
        }
    }

    #[async_std::test]
    async fn empty_header_table_is_just_terminator() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_headers(&Headers::new()).await.unwrap();
        assert_eq!(writer.into_inner(), b"\r\n");
    }
}
