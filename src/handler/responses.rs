use std::fmt::Display;

use async_std::io::Write;

use crate::http::response::{ResponseWriter, default_headers};
use crate::http::status::StatusCode;

pub const SUCCESS_PAGE: &str = r#"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Everything OK</p>
  </body>
</html>"#;

pub const BAD_REQUEST_PAGE: &str = r#"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Bad, Bad, Bad</p>
  </body>
</html>"#;

pub const SERVER_ERROR_PAGE: &str = r#"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>My bad, My bad, My bad</p>
  </body>
</html>"#;

/// Writes a complete HTML response.
pub async fn write_html<W>(w: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> std::io::Result<()>
where
    W: Write + Unpin,
{
    let body = page.as_bytes();
    let mut headers = default_headers(body.len());
    headers.set("content-type", "text/html");

    w.write_status_line(status).await?;
    w.write_headers(&headers).await?;
    w.write_body(body).await?;
    Ok(())
}

/// Reply sent when a request could not be parsed: `400` with a plain-text
/// body naming the error.
pub async fn write_bad_request<W>(w: &mut ResponseWriter<W>, err: &impl Display) -> std::io::Result<()>
where
    W: Write + Unpin,
{
    let body = format!("Bad Request: {err}");
    let headers = default_headers(body.len());

    w.write_status_line(StatusCode::BadRequest).await?;
    w.write_headers(&headers).await?;
    w.write_body(body.as_bytes()).await?;
    Ok(())
}
