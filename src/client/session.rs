//! Client session management
//!
//! Drives one connection through `Unregistered -> Registered -> Closed`.
//! The registry entry is owned by a [`RegistrationGuard`], so it is released
//! on every exit path, including early returns and panics.

use crate::client::profile::{Outbound, UserProfile};
use crate::client::registry::Registry;
use crate::error::{ChatServerError, ProtocolError, error_to_notice};
use crate::protocol::{Command, parse_command, parse_registration, responses};
use crate::routing::Router;
use log::{debug, info, warn};
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// Lifecycle phase of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unregistered,
    Registered,
    Closed,
}

/// Holds a session's registry entry and releases it exactly once.
pub struct RegistrationGuard {
    registry: Registry,
    profile: UserProfile,
    released: bool,
}

impl RegistrationGuard {
    pub fn new(registry: Registry, profile: UserProfile) -> Self {
        Self {
            registry,
            profile,
            released: false,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Removes the entry if it still belongs to this session. Later calls,
    /// and the eventual drop, do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.registry.release(&self.profile) {
            info!("{} went offline", self.profile.handle());
        }
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// One line read from the client: its text without the terminator, or the
/// reason it cannot be used.
type InboundLine = Result<String, ProtocolError>;

/// Server side of one client connection.
pub struct Session<R> {
    reader: BufReader<R>,
    outbound: Outbound,
    registry: Registry,
    router: Router,
    max_line_length: usize,
    peer: String,
    phase: SessionPhase,
}

impl<R> Session<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(
        reader: R,
        outbound: Outbound,
        registry: Registry,
        max_line_length: usize,
        peer: impl Into<String>,
    ) -> Self {
        let router = Router::new(registry.clone());
        Self {
            reader: BufReader::new(reader),
            outbound,
            registry,
            router,
            max_line_length,
            peer: peer.into(),
            phase: SessionPhase::Unregistered,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Runs the session to completion.
    ///
    /// Returns `Ok(())` when a registered client disconnects cleanly and the
    /// reason otherwise. Either way the session is closed and its handle is
    /// gone from the registry when this returns.
    pub async fn run(mut self) -> Result<(), ChatServerError> {
        let mut guard = match self.register().await {
            Ok(guard) => guard,
            Err(e) => {
                self.close().await;
                return Err(e);
            }
        };

        let result = self.serve(guard.profile()).await;

        guard.release();
        self.close().await;
        result
    }

    /// Reads the registration line and admits the handle.
    ///
    /// On success the session is `Registered` and the client has received
    /// the current listing as acknowledgment.
    pub async fn register(&mut self) -> Result<RegistrationGuard, ChatServerError> {
        let line = match self.read_line().await? {
            Some(line) => line,
            None => {
                return Err(ChatServerError::IoError(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Client disconnected before registering",
                )));
            }
        };

        let handle = match line.and_then(|text| parse_registration(&text)) {
            Ok(handle) => handle,
            Err(e) => return self.reject(ChatServerError::Protocol(e)).await,
        };

        let profile = match self.registry.register(&handle, self.outbound.clone()) {
            Ok(profile) => profile,
            Err(e) => return self.reject(ChatServerError::Registry(e)).await,
        };

        let guard = RegistrationGuard::new(self.registry.clone(), profile);
        self.phase = SessionPhase::Registered;
        info!("{} registered as {}", self.peer, handle);

        self.send_listing().await?;
        Ok(guard)
    }

    /// Processes commands until the client disconnects or the stream fails.
    pub async fn serve(&mut self, profile: &UserProfile) -> Result<(), ChatServerError> {
        while let Some(line) = self.read_line().await? {
            let command = match line {
                Ok(text) => parse_command(&text),
                Err(e) => Command::Invalid(e),
            };
            debug!("Received from {}: {:?}", profile.handle(), command);

            match command {
                Command::ShowUsers => self.send_listing().await?,
                Command::Message { to, body } => self.router.deliver(profile, &to, &body).await?,
                Command::Invalid(e) => {
                    warn!("{}: {}", profile.handle(), e);
                    self.notify(&ChatServerError::Protocol(e)).await?;
                }
            }
        }

        info!("Connection closed by {} ({})", profile.handle(), self.peer);
        Ok(())
    }

    /// Reads one line, holding at most `max_line_length` bytes plus a CRLF
    /// terminator in memory. Returns `None` at end of stream.
    ///
    /// An overlong line is drained up to its newline and reported as
    /// `LineTooLong`; a line that is not UTF-8 is reported as malformed.
    async fn read_line(&mut self) -> io::Result<Option<InboundLine>> {
        let limit = self.max_line_length.saturating_add(2);
        let mut buf = Vec::new();
        let read = (&mut self.reader)
            .take(limit as u64)
            .read_until(b'\n', &mut buf)
            .await?;

        if read == 0 {
            return Ok(None);
        }

        if read == limit && buf.last() != Some(&b'\n') {
            let drained = self.discard_line().await?;
            return Ok(Some(Err(ProtocolError::LineTooLong(read + drained))));
        }

        let content = strip_terminator(&buf);
        if content.len() > self.max_line_length {
            return Ok(Some(Err(ProtocolError::LineTooLong(content.len()))));
        }

        let line = String::from_utf8(content.to_vec()).map_err(|e| {
            ProtocolError::MalformedInput(String::from_utf8_lossy(e.as_bytes()).into_owned())
        });
        Ok(Some(line))
    }

    /// Consumes input through the next newline or end of stream, returning
    /// how many bytes were dropped.
    async fn discard_line(&mut self) -> io::Result<usize> {
        let mut discarded = 0;
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(discarded);
            }

            let newline = available.iter().position(|b| *b == b'\n');
            let len = available.len();
            match newline {
                Some(at) => {
                    self.reader.consume(at + 1);
                    return Ok(discarded + at + 1);
                }
                None => {
                    self.reader.consume(len);
                    discarded += len;
                }
            }
        }
    }

    async fn send_listing(&self) -> io::Result<()> {
        let listing = responses::online_users(&self.registry.list_handles());
        self.outbound.send_line(&listing).await
    }

    async fn notify(&self, err: &ChatServerError) -> io::Result<()> {
        match error_to_notice(err) {
            Some(notice) => self.outbound.send_line(&notice).await,
            None => Ok(()),
        }
    }

    /// Writes the notice for a failed registration and hands the error back.
    async fn reject<T>(&self, err: ChatServerError) -> Result<T, ChatServerError> {
        // Closing regardless of whether the notice got through.
        let _ = self.notify(&err).await;
        Err(err)
    }

    async fn close(&mut self) {
        self.phase = SessionPhase::Closed;
        let _ = self.outbound.shutdown().await;
    }
}

/// Drops a trailing `\n` and the `\r` before it, if any.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
