use std::fmt;

use thiserror::Error;

/// Status codes the [`ResponseWriter`](crate::http::response::ResponseWriter)
/// knows how to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,

    BadRequest = 400,
    NotFound = 404,

    InternalServerError = 500,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported status code {0}")]
pub struct UnknownStatus(pub u16);

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",                                       // 200
            StatusCode::BadRequest => "Bad Request",                      // 400
            StatusCode::NotFound => "Not Found",                          // 404
            StatusCode::InternalServerError => "Internal Server Error",   // 500
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = UnknownStatus;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(StatusCode::Ok),
            400 => Ok(StatusCode::BadRequest),
            404 => Ok(StatusCode::NotFound),
            500 => Ok(StatusCode::InternalServerError),
            _ => Err(UnknownStatus(code)),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_convert() {
        for code in [200, 400, 404, 500] {
            assert_eq!(StatusCode::try_from(code).unwrap().as_u16(), code);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(StatusCode::try_from(201), Err(UnknownStatus(201)));
        assert_eq!(StatusCode::try_from(999).unwrap_err().to_string(), "unsupported status code 999");
    }

    #[test]
    fn displays_code_and_reason() {
        assert_eq!(StatusCode::InternalServerError.to_string(), "500 Internal Server Error");
    }
}
