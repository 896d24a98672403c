//! Server configuration, loaded from a TOML file.
//!
//! ```toml
//! [http]
//! host = "0.0.0.0"
//! port = 8787
//!
//! [search]
//! results_per_source = 5
//! timeout_seconds = 8
//!
//! [search.cache]
//! ttl_seconds = 300
//! capacity = 100
//! ```
//!
//! Every key is optional.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tetra_search::SearchConfig;

use crate::error::{Result, ServerError};

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8787,
        }
    }
}

impl HttpConfig {
    /// Parse `host:port` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the host is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| ServerError::Config(format!("invalid listen address {addr:?}: {e}")))
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from `path` if given, otherwise from [`Self::default_config_path`]
    /// when that file exists, otherwise use defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` is unreadable, any file is
    /// malformed, or the resulting configuration fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    tracing::debug!(path = %default_path.display(), "loading default config file");
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate listener and search settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for a bad listen address and
    /// [`ServerError::Search`] for invalid search settings.
    pub fn validate(&self) -> Result<()> {
        self.http.socket_addr()?;
        self.search.validate()?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/tetra/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("tetra").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("tetra")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/tetra-config/config.toml")
        }
    }
}
