//! Where the enabled-protocol list comes from

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::properties::{self, HTTPS_PROTOCOLS_KEY};
use crate::error::{self, Result};
use crate::tls::{resolve_protocols, split_protocols};

/// Source of the comma-separated protocol list applied to new TLS sockets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolSource {
    /// No list; sockets keep the delegate's defaults
    Unrestricted,
    /// A list fixed at construction
    Fixed { protocols: String },
    /// A key in the process-wide property store, read on every call
    Property { key: String },
    /// An environment variable, read on every call
    Environment { var: String },
    /// A handle shared with the application, read on every call
    #[serde(skip)]
    Shared(SharedProtocols),
}

impl Default for ProtocolSource {
    fn default() -> Self {
        ProtocolSource::Property {
            key: HTTPS_PROTOCOLS_KEY.to_string(),
        }
    }
}

impl ProtocolSource {
    pub fn fixed(protocols: impl Into<String>) -> Self {
        ProtocolSource::Fixed {
            protocols: protocols.into(),
        }
    }

    pub fn property(key: impl Into<String>) -> Self {
        ProtocolSource::Property { key: key.into() }
    }

    pub fn environment(var: impl Into<String>) -> Self {
        ProtocolSource::Environment { var: var.into() }
    }

    /// The current value, or `None` when no restriction applies.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        match self {
            ProtocolSource::Unrestricted => None,
            ProtocolSource::Fixed { protocols } => Some(protocols.clone()),
            ProtocolSource::Property { key } => properties::get(key),
            ProtocolSource::Environment { var } => std::env::var(var).ok(),
            ProtocolSource::Shared(shared) => shared.get(),
        }
    }

    /// Freeze the current value into a `Fixed` or `Unrestricted` source.
    #[must_use]
    pub fn snapshot(&self) -> ProtocolSource {
        match self.resolve() {
            Some(protocols) => ProtocolSource::Fixed { protocols },
            None => ProtocolSource::Unrestricted,
        }
    }

    /// Whether the value can change after construction.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !matches!(
            self,
            ProtocolSource::Unrestricted | ProtocolSource::Fixed { .. }
        )
    }
}

/// Protocol list shared between the application and any number of factories.
#[derive(Debug, Clone, Default)]
pub struct SharedProtocols {
    value: Arc<RwLock<Option<String>>>,
}

impl SharedProtocols {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(protocols: impl Into<String>) -> Self {
        let shared = Self::new();
        shared.set(protocols);
        shared
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, protocols: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(protocols.into());
    }

    pub fn clear(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// When the source is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// On every socket creation
    #[default]
    PerCall,
    /// Once, when the factory is constructed
    Once,
}

/// When protocol names are checked against the versions rustls supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Bad names fail the handshake
    #[default]
    Lazy,
    /// A fixed list is checked at construction; bad names read later are logged
    Eager,
}

/// Configuration of the protocol-restricting factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionConfig {
    pub source: ProtocolSource,
    pub resolve: ResolveMode,
    pub validation: ValidationMode,
}

impl RestrictionConfig {
    #[must_use]
    pub fn new(source: ProtocolSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unrestricted() -> Self {
        Self::new(ProtocolSource::Unrestricted)
    }

    #[must_use]
    pub fn resolve(mut self, resolve: ResolveMode) -> Self {
        self.resolve = resolve;
        self
    }

    #[must_use]
    pub fn validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Check a fixed list when eager validation is requested.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error naming the
    /// first unknown or unsupported protocol.
    pub fn validate(&self) -> Result<()> {
        if self.validation != ValidationMode::Eager {
            return Ok(());
        }
        if let ProtocolSource::Fixed { protocols } = &self.source {
            resolve_protocols(&split_protocols(protocols)).map_err(error::configuration)?;
        }
        Ok(())
    }
}
