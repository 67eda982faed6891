//! Client management system
//!
//! Handles client connections, the shared registry of online handles, and
//! the per-connection session lifecycle.

pub mod handler;
pub mod profile;
pub mod registry;
pub mod session;

pub use handler::handle_client;
pub use profile::{Outbound, UserProfile};
pub use registry::Registry;
pub use session::{RegistrationGuard, Session, SessionPhase};
