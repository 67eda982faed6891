//! Message routing
//!
//! Resolves directed messages against the registry and forwards them.

pub mod router;

pub use router::Router;
