//! Error types
//!
//! Defines domain-specific error types for each module of the chat relay.

use std::fmt;
use std::io;

/// Registry errors
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateHandle(String),
    NotFound(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateHandle(h) => write!(f, "Handle already in use: {}", h),
            RegistryError::NotFound(h) => write!(f, "Handle not registered: {}", h),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Protocol (line grammar) errors
#[derive(Debug, PartialEq, Eq)]
pub enum ProtocolError {
    EmptyHandle,
    MalformedInput(String),
    LineTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::EmptyHandle => write!(f, "Registration line carried no handle"),
            ProtocolError::MalformedInput(line) => write!(f, "Malformed input: {:?}", line),
            ProtocolError::LineTooLong(len) => write!(f, "Line too long: {} bytes", len),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Message delivery errors
#[derive(Debug)]
pub enum DeliveryError {
    RecipientNotFound(String),
    WriteFailed { to: String, source: io::Error },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::RecipientNotFound(to) => write!(f, "Recipient not found: {}", to),
            DeliveryError::WriteFailed { to, source } => {
                write!(f, "Failed to write to {}: {}", to, source)
            }
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::WriteFailed { source, .. } => Some(source),
            DeliveryError::RecipientNotFound(_) => None,
        }
    }
}

/// General chat server error that encompasses all error types
#[derive(Debug)]
pub enum ChatServerError {
    Registry(RegistryError),
    Protocol(ProtocolError),
    Delivery(DeliveryError),
    IoError(io::Error),
    ConfigError(String),
}

impl fmt::Display for ChatServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServerError::Registry(e) => write!(f, "Registry error: {}", e),
            ChatServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ChatServerError::Delivery(e) => write!(f, "Delivery error: {}", e),
            ChatServerError::IoError(e) => write!(f, "I/O error: {}", e),
            ChatServerError::ConfigError(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ChatServerError {}

impl From<RegistryError> for ChatServerError {
    fn from(error: RegistryError) -> Self {
        ChatServerError::Registry(error)
    }
}

impl From<ProtocolError> for ChatServerError {
    fn from(error: ProtocolError) -> Self {
        ChatServerError::Protocol(error)
    }
}

impl From<DeliveryError> for ChatServerError {
    fn from(error: DeliveryError) -> Self {
        ChatServerError::Delivery(error)
    }
}

impl From<io::Error> for ChatServerError {
    fn from(error: io::Error) -> Self {
        ChatServerError::IoError(error)
    }
}

impl From<config::ConfigError> for ChatServerError {
    fn from(error: config::ConfigError) -> Self {
        ChatServerError::ConfigError(error.to_string())
    }
}
