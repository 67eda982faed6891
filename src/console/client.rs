//! Module `client`
//!
//! The terminal side of the protocol. Input lines are trimmed and sent
//! verbatim; the server does all parsing.

use log::{debug, info};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::ChatServerError;
use crate::protocol::{responses, strip_line_ending};

pub const HANDLE_PROMPT: &str = "Choose a handle, be cool";

/// Why the response relay stopped.
#[derive(Debug, PartialEq, Eq)]
pub enum ClientExit {
    /// The server closed the connection
    Disconnected,
    /// Registration was refused because the handle is taken
    HandleTaken,
}

/// Connects to `addr`, then shuttles stdin to the server and server lines
/// to stdout until the server hangs up.
pub async fn run_client(addr: &str) -> Result<ClientExit, ChatServerError> {
    let stream = TcpStream::connect(addr).await?;
    info!("Connected to {}", addr);

    let (read_half, write_half) = stream.into_split();
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}\n", HANDLE_PROMPT).as_bytes()).await?;
    stdout.flush().await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let input = tokio::spawn(forward_input(stdin, write_half));

    let exit = relay_responses(BufReader::new(read_half), stdout).await;

    // Stdin reads cannot be interrupted; abort instead of waiting for a keypress.
    input.abort();
    exit.map_err(ChatServerError::from)
}

/// Sends each trimmed input line to the server until input ends.
pub async fn forward_input<R, W>(input: R, mut server: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        server.write_all(line.trim().as_bytes()).await?;
        server.write_all(b"\n").await?;
        server.flush().await?;
    }
    debug!("Input closed");
    Ok(())
}

/// Copies server lines to `output` until the server disconnects or rejects
/// the handle.
pub async fn relay_responses<R, W>(mut server: R, mut output: W) -> io::Result<ClientExit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if server.read_line(&mut line).await? == 0 {
            return Ok(ClientExit::Disconnected);
        }

        let response = strip_line_ending(&line);
        output.write_all(response.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        if response == responses::DUPLICATE_HANDLE {
            return Ok(ClientExit::HandleTaken);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn input_lines_are_trimmed_and_forwarded() {
        let input: &[u8] = b"  alice  \nbob: hi there \n";
        let mut sent = Vec::new();

        forward_input(input, &mut sent).await.unwrap();

        assert_eq!(sent, b"alice\nbob: hi there\n");
    }

    #[tokio::test]
    async fn relay_stops_on_disconnect() {
        let server: &[u8] = b"Online Users alice\nbob : hey\n";
        let mut printed = Vec::new();

        let exit = relay_responses(server, &mut printed).await.unwrap();

        assert_eq!(exit, ClientExit::Disconnected);
        assert_eq!(printed, b"Online Users alice\nbob : hey\n");
    }

    #[tokio::test]
    async fn relay_stops_when_handle_is_taken() {
        let server: &[u8] = b"Handle Already In Use\nnever printed\n";
        let mut printed = Vec::new();

        let exit = relay_responses(server, &mut printed).await.unwrap();

        assert_eq!(exit, ClientExit::HandleTaken);
        assert_eq!(printed, b"Handle Already In Use\n");
    }
}
