//! tlspin public API
//!
//! Secure socket factories whose TLS connections negotiate only the protocol
//! versions you allow. [`TlsPin`] is the entry point; the full toolkit is
//! re-exported from `tlspin_client`.
//!
//! ```no_run
//! use std::io::{Read, Write};
//!
//! use tlspin::{SocketFactory, TlsPin};
//!
//! # fn main() -> tlspin::Result<()> {
//! TlsPin::set_protocols("TLSv1.2,TLSv1.3");
//!
//! let factory = TlsPin::builder().build()?;
//! let mut socket = factory.create_socket("example.com", 443)?;
//! socket.write_all(b"HEAD / HTTP/1.1\r\nHost: example.com\r\nConnection: close\r\n\r\n")?;
//!
//! let mut response = String::new();
//! socket.read_to_string(&mut response)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::path::Path;

pub use tlspin_client::config::properties;
pub use tlspin_client::{
    ConnectionParams, Error, FactoryConfig, HTTPS_PROTOCOLS_KEY, Kind, PlainSocketFactory,
    ProtocolRestrictingFactory, ProtocolSource, ProtocolVersion, ResolveMode, RestrictionConfig,
    Result, RustlsSocketFactory, SecureSocketFactory, SharedProtocols, Socket, SocketFactory,
    SocketFactoryBuilder, TlsConfig, TlsError, TlsSettings, TlsSocket, ValidationMode,
};

/// Main tlspin entry point providing static constructors
pub struct TlsPin;

impl TlsPin {
    /// Start a [`SocketFactoryBuilder`] with default settings.
    ///
    /// The resulting factory reads `https.protocols` on every socket creation.
    #[must_use]
    pub fn builder() -> SocketFactoryBuilder {
        SocketFactoryBuilder::new()
    }

    /// Build a restricting rustls factory from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`] error when the configuration is invalid.
    pub fn from_config(config: FactoryConfig) -> Result<ProtocolRestrictingFactory> {
        SocketFactoryBuilder::from_config(config).build()
    }

    /// Build a restricting rustls factory from a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`] error when the file cannot be read, parsed
    /// or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ProtocolRestrictingFactory> {
        Self::from_config(FactoryConfig::from_file(path)?)
    }

    /// Wrap an existing factory.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::InvalidArgument`] error when `factory` is absent or
    /// cannot create secure sockets.
    pub fn wrap(
        factory: Option<Box<dyn SocketFactory>>,
        config: RestrictionConfig,
    ) -> Result<ProtocolRestrictingFactory> {
        ProtocolRestrictingFactory::new(factory, config)
    }

    /// Set the process-wide `https.protocols` value.
    ///
    /// Returns the previous value.
    pub fn set_protocols(protocols: impl Into<String>) -> Option<String> {
        tracing::debug!("Setting process-wide {}", HTTPS_PROTOCOLS_KEY);
        properties::set(HTTPS_PROTOCOLS_KEY, protocols)
    }

    /// Remove the process-wide `https.protocols` value.
    pub fn clear_protocols() -> Option<String> {
        properties::clear(HTTPS_PROTOCOLS_KEY)
    }

    /// The current process-wide `https.protocols` value.
    #[must_use]
    pub fn protocols() -> Option<String> {
        properties::get(HTTPS_PROTOCOLS_KEY)
    }
}
