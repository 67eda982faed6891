//! Configuration management for the chat relay
//!
//! Layers built-in defaults, an optional TOML file and `MC_CHAT_*`
//! environment variables into a single [`ServerConfig`].

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Well-known port the relay listens on and clients dial.
pub const DEFAULT_PORT: u16 = 14610;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Default config file name, resolved by the `config` crate (`config.toml`).
pub const DEFAULT_CONFIG_FILE: &str = "config";

const ENV_PREFIX: &str = "MC_CHAT";

/// Complete server configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// IP address the listener binds to
    pub bind_address: String,

    /// TCP port for client connections; 0 asks the OS for an ephemeral port
    pub port: u16,

    /// Longest accepted protocol line in bytes, excluding the `\n` or `\r\n` terminator
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from the named file (if present) with environment overrides.
    ///
    /// A missing file is not an error; defaults fill any key the file and
    /// environment leave unset.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("max_line_length", DEFAULT_MAX_LINE_LENGTH as i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loopback configuration on an OS-assigned port
    pub fn ephemeral() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.max_line_length == 0 {
            return Err(ConfigError::Message(
                "max_line_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
