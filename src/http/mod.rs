use std::fmt;
use std::str::FromStr;

pub mod headers;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod status;

/// Line terminator used by the request-line, field lines and the header block.
pub const CRLF: &[u8] = b"\r\n";

/// The only protocol version accepted in a request-line.
pub const HTTP_VERSION: &str = "1.1";

/// Methods accepted in a request-line.
/// Anything else, including a lower-case spelling of these, is rejected by the
/// [`parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Update,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Update => "UPDATE",
            Method::Head => "HEAD",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "UPDATE" => Ok(Method::Update),
            "HEAD" => Ok(Method::Head),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
