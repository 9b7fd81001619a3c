//! Rustls-backed secure socket factory

use std::net::{IpAddr, TcpStream};
use std::sync::Arc;

use super::plain::open_stream;
use super::{SecureSocketFactory, SocketFactory};
use crate::config::ConnectionParams;
use crate::connect::types::{Socket, TlsSocket, server_name};
use crate::error::{self, Result};
use crate::tls::{TlsConfig, TlsSettings};

/// Creates [`Socket::Tls`] connections using rustls.
///
/// Sockets are returned before the handshake, so callers (or wrappers) can
/// still adjust their enabled protocols.
#[derive(Debug, Clone)]
pub struct RustlsSocketFactory {
    settings: Arc<TlsSettings>,
    params: ConnectionParams,
}

impl RustlsSocketFactory {
    #[must_use]
    pub fn new(settings: TlsSettings, params: ConnectionParams) -> Self {
        Self {
            settings: Arc::new(settings),
            params,
        }
    }

    /// Build a factory from serializable TLS configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when the
    /// root certificates cannot be loaded or `params` are invalid.
    pub fn from_config(tls: &TlsConfig, params: ConnectionParams) -> Result<Self> {
        params.validate().map_err(error::configuration)?;
        let settings = TlsSettings::from_config(tls).map_err(error::configuration)?;
        Ok(Self::new(settings, params))
    }

    #[must_use]
    pub fn settings(&self) -> &TlsSettings {
        &self.settings
    }

    /// Parameters used by the operations that take none.
    #[must_use]
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    fn wrap(&self, stream: TcpStream, host: &str, auto_close: bool) -> Result<Socket> {
        let name = server_name(host)?;
        tracing::trace!("Creating TLS socket for {}", host);
        Ok(Socket::Tls(TlsSocket::new(
            stream,
            name,
            self.settings.clone(),
            auto_close,
        )))
    }
}

impl SocketFactory for RustlsSocketFactory {
    fn create_socket(&self, host: &str, port: u16) -> Result<Socket> {
        self.create_socket_with_params(host, port, None, 0, &self.params)
    }

    fn create_socket_bound(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
    ) -> Result<Socket> {
        self.create_socket_with_params(host, port, local_address, local_port, &self.params)
    }

    fn create_socket_with_params(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
        params: &ConnectionParams,
    ) -> Result<Socket> {
        // Reject a bad server name before touching the network.
        server_name(host)?;
        let stream = open_stream(host, port, local_address, local_port, params)?;
        self.wrap(stream, host, true)
    }

    fn into_secure(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn SecureSocketFactory>, Box<dyn SocketFactory>> {
        Ok(self)
    }
}

impl SecureSocketFactory for RustlsSocketFactory {
    fn create_layered_socket(
        &self,
        socket: TcpStream,
        host: &str,
        port: u16,
        auto_close: bool,
    ) -> Result<Socket> {
        tracing::debug!("Layering TLS over existing connection to {}:{}", host, port);
        self.wrap(socket, host, auto_close)
    }
}
