//! Top-level factory configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::connection::ConnectionParams;
use super::protocols::RestrictionConfig;
use crate::error::{self, Result};
use crate::tls::TlsConfig;

/// Complete configuration for a protocol-restricting rustls socket factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub tls: TlsConfig,
    pub connection: ConnectionParams,
    pub restriction: RestrictionConfig,
}

impl FactoryConfig {
    /// Parse configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when the
    /// text is not valid JSON for this structure or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FactoryConfig = serde_json::from_str(json).map_err(error::configuration)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when the
    /// file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            error::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!("Loading socket factory configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure as a
    /// [`Kind::Config`](crate::error::Kind::Config) error.
    pub fn validate(&self) -> Result<()> {
        self.connection.validate().map_err(error::configuration)?;
        self.restriction.validate()
    }
}
