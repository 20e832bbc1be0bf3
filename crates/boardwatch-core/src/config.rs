//! Configuration loading and typed config structures for Boardwatch.
//!
//! Configuration lives in an optional `boardwatch.yaml` next to the
//! binary's working directory. Every field has a default, so an absent
//! file or an empty document yields a working setup.

use std::path::Path;

use serde::Deserialize;

use crate::dispatch::DEFAULT_QUEUE_CAPACITY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held a value of the wrong shape.
    #[error("invalid value {value:?} for {variable}")]
    InvalidOverride {
        /// The environment variable name.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoardwatchConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Spectator fan-out settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl BoardwatchConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// - `PORT` overrides `server.port`
    /// - `HOST` overrides `server.host`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults. Environment
    /// overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `PORT` / `HOST` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_parse_err: core::num::ParseIntError| ConfigError::InvalidOverride {
                    variable: "PORT",
                    value: port.clone(),
                })?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Spectator fan-out settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatchConfig {
    /// Frames that may queue for one spectator before it is considered
    /// too slow and detached.
    #[serde(default = "default_queue_capacity")]
    pub subscriber_queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8181
}

const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
