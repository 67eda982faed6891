//! Module `commands`
//!
//! The line grammar: a registration line, `SHOW USERS`, and directed
//! `<to>: <body>` messages. Parsing is pure; nothing here touches the
//! registry, so a recipient that is not online still parses as a message.

use crate::error::ProtocolError;

/// Literal, case-sensitive listing command.
pub const SHOW_USERS_COMMAND: &str = "SHOW USERS";

/// A classified client line received after registration.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    ShowUsers,
    /// `<to>: <body>`, both trimmed, body non-empty
    Message { to: String, body: String },
    Invalid(ProtocolError),
}

/// Removes one trailing `\n` and an optional `\r` before it.
pub fn strip_line_ending(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Reads the first line of a connection as the handle to register under.
pub fn parse_registration(raw: &str) -> Result<String, ProtocolError> {
    let handle = raw.trim();
    if handle.is_empty() {
        Err(ProtocolError::EmptyHandle)
    } else {
        Ok(handle.to_string())
    }
}

/// Classifies a line received after registration.
pub fn parse_command(raw: &str) -> Command {
    let line = strip_line_ending(raw);

    if line.trim() == SHOW_USERS_COMMAND {
        return Command::ShowUsers;
    }

    match line.split_once(':') {
        Some((to, body)) if !body.trim().is_empty() => Command::Message {
            to: to.trim().to_string(),
            body: body.trim().to_string(),
        },
        _ => Command::Invalid(ProtocolError::MalformedInput(line.to_string())),
    }
}
