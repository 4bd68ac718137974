//! HTTP header table shared by [`Request`](crate::http::request::Request) and
//! the [`ResponseWriter`](crate::http::response::ResponseWriter).
//!
//! Names are case-insensitive: they are stored lower-cased and every lookup
//! lower-cases the queried name first. Entries keep their first-insertion
//! order so serialized headers come out in a stable order.
//!
//! [`Headers::parse`] is the incremental field-line parser. It is called
//! repeatedly on the unconsumed remainder of the input and consumes at most one
//! line per call.

use indexmap::IndexMap;
use thiserror::Error;

use crate::http::CRLF;

/// Characters allowed in a header name besides ASCII letters and digits.
const SPECIAL_CHARS: &[u8] = b"!#$%&'*+-.^_`|~";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("malformed key")]
    MalformedKey,

    #[error("missing colon")]
    MissingColon,

    #[error("invalid char in header key")]
    InvalidKey,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: IndexMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    /// Parses a single field line from the start of `buf`.
    ///
    /// Returns the number of bytes consumed and whether the line was the empty
    /// terminator line. `Ok((0, false))` means `buf` holds no complete line yet.
    /// On error nothing is consumed and the table is left untouched.
    pub fn parse(&mut self, buf: &[u8]) -> Result<(usize, bool), HeaderError> {
        let Some(line_end) = find_crlf(buf) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        // Values may carry obs-text; names are checked against ASCII below, so
        // a replacement character in the name still fails validation.
        let line = String::from_utf8_lossy(&buf[..line_end]);

        // Everything after the first colon is the value, colons included.
        let (raw_name, raw_value) = match line.split_once(':') {
            Some((name, value)) => (name, value),
            None if line != line.trim_end() => return Err(HeaderError::MalformedKey),
            None => return Err(HeaderError::MissingColon),
        };

        if raw_name != raw_name.trim_end() {
            return Err(HeaderError::MalformedKey);
        }

        let name = raw_name.trim().to_ascii_lowercase();
        if !is_valid_name(&name) {
            return Err(HeaderError::InvalidKey);
        }

        self.append(&name, raw_value.trim());
        Ok((line_end + CRLF.len(), false))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(name.to_ascii_lowercase().as_str())
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Stores `value` under `name`, joining it to an existing value with `", "`.
    pub fn append(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.headers.get_mut(&name) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                self.headers.insert(name, value.to_string());
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.headers.shift_remove(name.to_ascii_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `content-length` header, if present, parsed as a byte count.
    pub fn content_length(&self) -> Option<Result<usize, std::num::ParseIntError>> {
        self.get("content-length").map(str::parse::<usize>)
    }
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|w| w == CRLF)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(&b))
}
