//! Error handling
//!
//! Defines error types and handling for the chat relay.

pub mod handlers;
pub mod types;

pub use handlers::{error_to_notice, handle_error};
pub use types::*;
