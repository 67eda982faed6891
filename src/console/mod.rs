//! Interactive terminal client
//!
//! Dials a relay, forwards typed lines and prints whatever the server sends.

pub mod client;

pub use client::{ClientExit, forward_input, relay_responses, run_client};
