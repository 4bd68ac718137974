use async_std::io::Write;
use tracing::debug;

use crate::handler::Handler;
use crate::handler::responses::{self, BAD_REQUEST_PAGE, SERVER_ERROR_PAGE, SUCCESS_PAGE};
use crate::http::request::Request;
use crate::http::response::ResponseWriter;
use crate::http::status::StatusCode;

/// Answers every request with one of the canned pages, picked by target:
/// `/yourproblem` gets a 400, `/myproblem` a 500 and anything else a 200.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoHandler;

impl DemoHandler {
    fn route(target: &str) -> (StatusCode, &'static str) {
        match target {
            "/yourproblem" => (StatusCode::BadRequest, BAD_REQUEST_PAGE),
            "/myproblem" => (StatusCode::InternalServerError, SERVER_ERROR_PAGE),
            _ => (StatusCode::Ok, SUCCESS_PAGE),
        }
    }
}

impl Handler for DemoHandler {
    async fn handle<W>(&self, w: &mut ResponseWriter<W>, req: Request) -> std::io::Result<()>
    where
        W: Write + Unpin + Send,
    {
        let (status, page) = Self::route(req.target().unwrap_or("/"));
        debug!(path = ?req.target(), %status, "demo handler");
        responses::write_html(w, status, page).await
    }
}
