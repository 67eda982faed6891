//! Chat line protocol
//!
//! Parses newline-delimited client commands and formats server responses.

pub mod commands;
pub mod responses;

pub use commands::{Command, parse_command, parse_registration, strip_line_ending};
