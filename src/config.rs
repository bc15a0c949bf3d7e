//! Configuration module for chatrelay.

use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "CHATRELAY_LOG_LEVEL";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether to serve the public directory.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to the public directory with the browser client.
    #[serde(default = "default_public_path")]
    pub public_path: String,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_serve_static() -> bool {
    true
}

fn default_public_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            serve_static: default_serve_static(),
            public_path: default_public_path(),
            cors_origins: vec![],
        }
    }
}

/// Chat behaviour configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Name used as the sender of system notices.
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
    /// Notice sent to a connection right after it joins.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    /// Host used when building location links.
    #[serde(default = "default_maps_host")]
    pub maps_host: String,
    /// Words added to the built-in profanity list.
    #[serde(default)]
    pub blocked_words: Vec<String>,
    /// Words removed from the built-in profanity list.
    #[serde(default)]
    pub allowed_words: Vec<String>,
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

fn default_welcome_message() -> String {
    "Welcome!".to_string()
}

fn default_maps_host() -> String {
    "google.com".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            admin_name: default_admin_name(),
            welcome_message: default_welcome_message(),
            maps_host: default_maps_host(),
            blocked_words: vec![],
            allowed_words: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file. Logs go to stdout only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Chat configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listening port
    /// - `CHATRELAY_LOG_LEVEL`: log level
    ///
    /// An invalid `PORT` leaves the configured port in place and is returned
    /// as an error after the remaining overrides have been applied.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }

        if let Some(port) = lookup(PORT_ENV) {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| RelayError::Config(format!("invalid {PORT_ENV} value: {port:?}")))?;
            self.server.port = port;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chat.maps_host.trim().is_empty() {
            return Err(RelayError::Validation(
                "chat.maps_host must not be empty".to_string(),
            ));
        }
        if self.chat.admin_name.trim().is_empty() {
            return Err(RelayError::Validation(
                "chat.admin_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
