//! Module `profile`
//!
//! Defines `UserProfile`, one registered participant, and `Outbound`, the
//! shared write side of a client connection.

use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Write half of a client connection.
///
/// Cloning shares the same stream. Each line is written and flushed under a
/// lock so concurrent senders never interleave bytes within a line.
#[derive(Clone)]
pub struct Outbound {
    writer: Arc<Mutex<BoxedWriter>>,
}

impl Outbound {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Writes `line` followed by `\n` and flushes.
    pub async fn send_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }

    /// Shuts down the write direction of the stream.
    pub async fn shutdown(&self) -> io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

impl fmt::Debug for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbound").finish_non_exhaustive()
    }
}

/// An online, registered participant.
///
/// The handle is fixed for the lifetime of the session. `session_id` is
/// assigned by the registry and tells apart two sessions that held the same
/// handle at different times.
#[derive(Debug, Clone)]
pub struct UserProfile {
    handle: String,
    session_id: u64,
    outbound: Outbound,
}

impl UserProfile {
    pub(crate) fn new(handle: String, session_id: u64, outbound: Outbound) -> Self {
        Self {
            handle,
            session_id,
            outbound,
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// Writes one line to this participant's connection.
    pub async fn send_line(&self, line: &str) -> io::Result<()> {
        self.outbound.send_line(line).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn send_line_appends_newline() {
        let (local, remote) = tokio::io::duplex(64);
        let outbound = Outbound::new(local);
        let mut reader = BufReader::new(remote);

        outbound.send_line("hello").await.unwrap();

        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "hello\n");
    }

    #[tokio::test]
    async fn send_line_fails_once_peer_is_gone() {
        let (local, remote) = tokio::io::duplex(64);
        drop(remote);
        let outbound = Outbound::new(local);

        assert!(outbound.send_line("anyone?").await.is_err());
    }
}
