//! Protocol-restricting socket factory
//!
//! Wraps a secure socket factory and, after each socket it creates, narrows
//! the socket's enabled TLS protocol versions to the configured list. Plain
//! sockets and an absent list leave the socket untouched.

use std::net::{IpAddr, TcpStream};

use super::{SecureSocketFactory, SocketFactory};
use crate::config::{
    ConnectionParams, ProtocolSource, ResolveMode, RestrictionConfig, ValidationMode,
};
use crate::connect::types::{Socket, TlsSocket};
use crate::error::{self, Result};
use crate::tls::{resolve_protocols, split_protocols};

/// Secure socket factory that enforces a protocol version list.
#[derive(Debug)]
pub struct ProtocolRestrictingFactory {
    base: Box<dyn SecureSocketFactory>,
    source: ProtocolSource,
    validation: ValidationMode,
}

impl ProtocolRestrictingFactory {
    /// Wrap `base`, which must be present and able to create secure sockets.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::InvalidArgument`](crate::error::Kind::InvalidArgument)
    /// error when `base` is `None` or not a secure factory, and a
    /// [`Kind::Config`](crate::error::Kind::Config) error when eager
    /// validation rejects the configured list.
    pub fn new(base: Option<Box<dyn SocketFactory>>, config: RestrictionConfig) -> Result<Self> {
        let base = base.ok_or_else(|| error::invalid_argument("a socket factory is required"))?;
        let base = base.into_secure().map_err(|plain| {
            error::invalid_argument(format!("{plain:?} cannot create secure sockets"))
        })?;
        Self::from_secure(base, config)
    }

    /// Wrap a factory already known to be secure.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when eager
    /// validation rejects the configured list.
    pub fn wrap<F: SecureSocketFactory + 'static>(
        base: F,
        config: RestrictionConfig,
    ) -> Result<Self> {
        Self::from_secure(Box::new(base), config)
    }

    fn from_secure(base: Box<dyn SecureSocketFactory>, config: RestrictionConfig) -> Result<Self> {
        let source = match config.resolve {
            ResolveMode::PerCall => config.source.clone(),
            ResolveMode::Once => config.source.snapshot(),
        };
        let config = RestrictionConfig { source, ..config };
        config.validate()?;

        tracing::debug!(
            "Restricting protocols of {:?} using {:?}",
            base,
            config.source
        );
        Ok(Self {
            base,
            source: config.source,
            validation: config.validation,
        })
    }

    /// Where the protocol list is read from.
    #[must_use]
    pub fn source(&self) -> &ProtocolSource {
        &self.source
    }

    /// Apply the configured protocol list to a freshly created socket.
    fn enable_socket_protocols(&self, mut socket: Socket) -> Socket {
        if let Some(tls) = socket.as_tls_mut() {
            self.restrict(tls);
        }
        socket
    }

    fn restrict(&self, tls: &mut TlsSocket) {
        let Some(value) = self.source.resolve() else {
            tracing::trace!("No protocol list configured; keeping defaults");
            return;
        };

        let protocols = split_protocols(&value);
        if self.validation == ValidationMode::Eager {
            if let Err(e) = resolve_protocols(&protocols) {
                tracing::warn!(
                    "Configured protocol list {:?} will fail the handshake: {}",
                    value,
                    e
                );
            }
        }

        tracing::debug!("Enabling protocols {:?} on {:?}", protocols, tls.server_name());
        tls.set_enabled_protocols(protocols);
    }
}

impl SocketFactory for ProtocolRestrictingFactory {
    fn create_socket(&self, host: &str, port: u16) -> Result<Socket> {
        self.base
            .create_socket(host, port)
            .map(|socket| self.enable_socket_protocols(socket))
    }

    fn create_socket_bound(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
    ) -> Result<Socket> {
        self.base
            .create_socket_bound(host, port, local_address, local_port)
            .map(|socket| self.enable_socket_protocols(socket))
    }

    fn create_socket_with_params(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
        params: &ConnectionParams,
    ) -> Result<Socket> {
        self.base
            .create_socket_with_params(host, port, local_address, local_port, params)
            .map(|socket| self.enable_socket_protocols(socket))
    }

    fn into_secure(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn SecureSocketFactory>, Box<dyn SocketFactory>> {
        Ok(self)
    }
}

impl SecureSocketFactory for ProtocolRestrictingFactory {
    fn create_layered_socket(
        &self,
        socket: TcpStream,
        host: &str,
        port: u16,
        auto_close: bool,
    ) -> Result<Socket> {
        self.base
            .create_layered_socket(socket, host, port, auto_close)
            .map(|socket| self.enable_socket_protocols(socket))
    }
}
