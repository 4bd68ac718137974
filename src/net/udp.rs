//! Line sender: every line typed on stdin goes out as one UDP datagram.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_std::io::{self, BufRead, BufReadExt, BufReader, WriteExt};
use async_std::net::UdpSocket;
use tracing::warn;

/// Reads stdin until EOF, sending each line to `target`.
pub async fn run(target: SocketAddr) -> std::io::Result<()> {
    let socket = connect(target).await?;
    let sent = send_lines(BufReader::new(io::stdin()), &socket, true).await?;
    println!();
    tracing::info!("Sent {sent} line(s) to {target}");
    Ok(())
}

pub async fn connect(target: SocketAddr) -> std::io::Result<UdpSocket> {
    let local: SocketAddr = match target {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(target).await?;
    Ok(socket)
}

/// Sends every line of `input`, newline included. A failed send is logged and
/// the next line is tried. Returns the number of lines sent.
pub async fn send_lines<R>(mut input: R, socket: &UdpSocket, prompt: bool) -> std::io::Result<usize>
where
    R: BufRead + Unpin,
{
    let mut stdout = io::stdout();
    let mut sent = 0;

    loop {
        if prompt {
            stdout.write_all(b">").await?;
            stdout.flush().await?;
        }

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            break;
        }

        match socket.send(line.as_bytes()).await {
            Ok(_) => sent += 1,
            Err(err) => warn!("Error while writing: {err}"),
        }
    }

    Ok(sent)
}
