//! Drives the [`parser`](crate::http::parser) from a byte stream.
//!
//! Bytes are read into a fixed-capacity buffer and the unconsumed prefix is
//! offered to [`Request::advance`] until it stops making progress. Only then
//! is the stream read again. The buffer is compacted after every step so the
//! parser always sees the unconsumed bytes at offset 0.

use std::io::ErrorKind;
use std::time::Duration;

use async_std::io::{self, Read, ReadExt};
use thiserror::Error;
use tracing::trace;

use crate::http::parser::ParseError;
use crate::http::request::Request;

/// Errors that interrupt reading a request from the stream.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed before the request was complete")]
    ConnectionClosed,

    #[error("timed out waiting for request data")]
    Timeout,

    #[error("request does not fit in the {capacity} byte read buffer")]
    RequestTooLarge { capacity: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ReadError {
    /// Whether the client should be told its request was rejected.
    /// Transport failures just close the connection.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ReadError::Parse(_) | ReadError::RequestTooLarge { .. })
    }
}

/// Reads one complete request, blocking on the stream as long as it takes.
pub async fn read_request<R>(reader: &mut R, capacity: usize) -> Result<Request, ReadError>
where
    R: Read + Unpin,
{
    read_request_with_timeout(reader, capacity, None).await
}

/// Like [`read_request`], but every single read must complete within
/// `read_timeout` when one is given.
pub async fn read_request_with_timeout<R>(
    reader: &mut R,
    capacity: usize,
    read_timeout: Option<Duration>,
) -> Result<Request, ReadError>
where
    R: Read + Unpin,
{
    let mut req = Request::new();
    let mut buf = vec![0; capacity];
    let mut buf_len = 0;
    let mut needs_read = true;

    while !req.is_done() {
        if needs_read {
            if buf_len == buf.len() {
                return Err(ReadError::RequestTooLarge { capacity });
            }

            let n = read_chunk(reader, &mut buf[buf_len..], read_timeout).await?;
            if n == 0 {
                return Err(ReadError::ConnectionClosed);
            }
            buf_len += n;
        }

        let consumed = req.advance(&buf[..buf_len])?;
        buf.copy_within(consumed..buf_len, 0);
        buf_len -= consumed;

        trace!(consumed, buffered = buf_len, state = ?req.state(), "advanced parser");
        needs_read = consumed == 0 && !req.is_done();
    }

    Ok(req)
}

async fn read_chunk<R>(
    reader: &mut R,
    buf: &mut [u8],
    read_timeout: Option<Duration>,
) -> Result<usize, ReadError>
where
    R: Read + Unpin,
{
    loop {
        let res = match read_timeout {
            Some(dur) => io::timeout(dur, reader.read(buf)).await,
            None => reader.read(buf).await,
        };

        match res {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::TimedOut => return Err(ReadError::Timeout),
            Err(e) => return Err(ReadError::Io(e)),
        }
    }
}
