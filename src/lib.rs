//! Many-to-many chat relay over newline-delimited TCP.
//!
//! Clients register a unique handle with their first line, then list online
//! users with `SHOW USERS` or send `<to>: <body>` to another handle.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod protocol;
pub mod routing;
pub mod server;
pub mod utils;

pub use crate::client::Registry;
pub use crate::config::ServerConfig;
pub use crate::server::Server;
