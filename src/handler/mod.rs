//! Request handlers.
//!
//! A [`Handler`] receives the fully parsed [`Request`] and a
//! [`ResponseWriter`] bound to the same connection. It is expected to call
//! `write_status_line`, `write_headers` and `write_body` in that order.

mod demo;
pub mod responses;

use std::future::Future;

use async_std::io::Write;

use crate::http::request::Request;
use crate::http::response::ResponseWriter;

pub use demo::DemoHandler;
pub use responses::write_bad_request;

pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        w: &mut ResponseWriter<W>,
        req: Request,
    ) -> impl Future<Output = std::io::Result<()>> + Send
    where
        W: Write + Unpin + Send;
}
