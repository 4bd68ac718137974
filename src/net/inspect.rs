//! Debug listener: parses whatever arrives and prints it instead of replying.

use std::fmt::Write as _;
use std::net::SocketAddr;

use async_std::net::TcpListener;
use tracing::{info, warn};

use crate::http::reader::read_request;
use crate::http::request::Request;

/// Accepts connections one after another and prints each parsed request to
/// stdout. Runs until the process is stopped.
pub async fn run(addr: SocketAddr, buffer_size: usize) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Inspecting requests on {}", listener.local_addr()?);

    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!("Error accepting connection: {err}");
                continue;
            }
        };

        match read_request(&mut stream, buffer_size).await {
            Ok(req) => println!("{}", describe(&req)),
            Err(err) => warn!(%peer, "Could not read request: {err}"),
        }
    }
}

pub fn describe(req: &Request) -> String {
    let mut out = String::from("Request line:\n");
    if let Some(rl) = req.request_line() {
        let _ = writeln!(out, "- Method: {}", rl.method);
        let _ = writeln!(out, "- Target: {}", rl.target);
        let _ = writeln!(out, "- Version: {}", rl.http_version);
    }

    out.push_str("Headers:\n");
    for (name, value) in req.headers().iter() {
        let _ = writeln!(out, "{name}: {value}");
    }

    out.push_str("Body:\n");
    out.push_str(&String::from_utf8_lossy(req.body()));
    out
}
