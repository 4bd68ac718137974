//! TCP front end.
//!
//! This module only deals with connections: accepting them, running one task
//! per connection and closing them. Reading the request is delegated to
//! [`http::reader`](crate::http::reader) and producing the response to a
//! [`Handler`].
//!
//! ## Connection lifecycle
//!
//! 1. Accept a TCP connection and spawn a task for it
//! 2. Read and incrementally parse exactly one request
//! 3. On a parse error, write a best-effort `400` naming the error
//! 4. Otherwise hand the request and a [`ResponseWriter`] to the handler
//! 5. Close the connection
//!
//! Tasks never share state. Closing the server only stops the accept loop;
//! connections already being served run to completion on their own.

use std::net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_std::io::{self, ReadExt};
use async_std::net::{TcpListener, TcpStream};
use async_std::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::handler::{Handler, write_bad_request};
use crate::http::reader::read_request_with_timeout;
use crate::http::response::ResponseWriter;

/// How long a closing connection keeps draining client input.
const LINGER_TIMEOUT: Duration = Duration::from_secs(1);

pub struct Server<H> {
    listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    buffer_size: usize,
    read_timeout: Option<Duration>,
}

/// Stops a running [`Server`] from accepting new connections.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    closed: Arc<AtomicBool>,
    local_addr: SocketAddr,
}

impl<H: Handler> Server<H> {
    pub async fn bind(config: &ServerConfig, handler: H) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.socket_addr()).await?;

        Ok(Self {
            listener,
            handler: Arc::new(handler),
            closed: Arc::new(AtomicBool::new(false)),
            buffer_size: config.buffer_size,
            read_timeout: config.read_timeout,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handle(&self) -> std::io::Result<ServerHandle> {
        Ok(ServerHandle {
            closed: self.closed.clone(),
            local_addr: self.local_addr()?,
        })
    }

    /// Accepts connections until the server is closed.
    ///
    /// Accept errors are logged and retried unless the server was closed, in
    /// which case the loop ends quietly.
    pub async fn run(self) -> std::io::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    if self.closed.load(Ordering::SeqCst) {
                        break;
                    }

                    let handler = self.handler.clone();
                    task::spawn(handle_connection(
                        stream,
                        peer,
                        handler,
                        self.buffer_size,
                        self.read_timeout,
                    ));
                }
                Err(err) => {
                    if self.closed.load(Ordering::SeqCst) {
                        break;
                    }
                    warn!("Error accepting connection: {err}");
                }
            }
        }

        debug!("Accept loop stopped");
        Ok(())
    }

    /// Binds and runs the accept loop on a background task.
    pub async fn serve(
        config: &ServerConfig,
        handler: H,
    ) -> std::io::Result<(ServerHandle, JoinHandle<std::io::Result<()>>)> {
        let server = Self::bind(config, handler).await?;
        let handle = server.handle()?;
        Ok((handle, task::spawn(server.run())))
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Flags the server as closed and wakes the pending accept with a
    /// throwaway connection so the loop can observe the flag.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut wake_addr = self.local_addr;
        if wake_addr.ip().is_unspecified() {
            wake_addr.set_ip(match wake_addr {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            });
        }

        if let Err(err) = TcpStream::connect(wake_addr).await {
            debug!("Could not wake accept loop: {err}");
        }
    }
}

async fn handle_connection<H: Handler>(
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<H>,
    buffer_size: usize,
    read_timeout: Option<Duration>,
) {
    let mut reader = &stream;
    let result = read_request_with_timeout(&mut reader, buffer_size, read_timeout).await;
    let mut writer = ResponseWriter::new(&stream);

    match result {
        Ok(req) => {
            if let Some(rl) = req.request_line() {
                debug!(%peer, method = %rl.method, path = %rl.target, "request");
            }
            if let Err(err) = handler.handle(&mut writer, req).await {
                debug!(%peer, "Failed to write response: {err}");
            }
        }
        Err(err) if err.is_bad_request() => {
            info!(%peer, "Rejected request: {err}");
            if let Err(err) = write_bad_request(&mut writer, &err).await {
                debug!(%peer, "Failed to write 400 response: {err}");
            }
        }
        Err(err) => {
            debug!(%peer, "Dropping connection: {err}");
        }
    }

    linger_close(&stream).await;
}

/// Sends FIN, then discards whatever the client still sends for a short
/// while. Closing with unread input would reset the connection and the
/// client could lose the response.
async fn linger_close(stream: &TcpStream) {
    if stream.shutdown(Shutdown::Write).is_err() {
        return;
    }

    let mut reader = stream;
    let mut scratch = [0; 512];
    let drain = async {
        while reader.read(&mut scratch).await? > 0 {}
        Ok::<_, std::io::Error>(())
    };
    let _ = io::timeout(LINGER_TIMEOUT, drain).await;
}
