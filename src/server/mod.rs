//! Server core functionality
//!
//! Binds the listener and runs one session task per accepted connection.

pub mod core;

pub use core::Server;
