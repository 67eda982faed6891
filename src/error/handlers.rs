//! Error handlers
//!
//! Logs errors and translates them into client-bound notice lines.

use crate::error::types::{ChatServerError, DeliveryError, ProtocolError, RegistryError};
use crate::protocol::responses;
use log::{error, warn};

/// Log a chat server error at a level matching its severity
pub fn handle_error(err: &ChatServerError) {
    match err {
        ChatServerError::IoError(_) | ChatServerError::ConfigError(_) => {
            error!("Chat Server Error: {}", err)
        }
        _ => warn!("Chat Server Error: {}", err),
    }
}

/// Convert error to the notice line sent back to the client.
///
/// Stream and configuration failures have no client-facing notice.
pub fn error_to_notice(err: &ChatServerError) -> Option<String> {
    let notice = match err {
        ChatServerError::Registry(RegistryError::DuplicateHandle(_)) => {
            responses::DUPLICATE_HANDLE.to_string()
        }
        ChatServerError::Registry(RegistryError::NotFound(to))
        | ChatServerError::Delivery(DeliveryError::RecipientNotFound(to)) => {
            responses::recipient_not_found(to)
        }
        ChatServerError::Delivery(DeliveryError::WriteFailed { to, .. }) => {
            responses::delivery_failed(to)
        }
        ChatServerError::Protocol(ProtocolError::EmptyHandle) => {
            responses::INVALID_HANDLE.to_string()
        }
        ChatServerError::Protocol(ProtocolError::LineTooLong(_)) => {
            responses::LINE_TOO_LONG.to_string()
        }
        ChatServerError::Protocol(ProtocolError::MalformedInput(_)) => {
            responses::MALFORMED_INPUT.to_string()
        }
        ChatServerError::IoError(_) | ChatServerError::ConfigError(_) => return None,
    };
    Some(notice)
}
