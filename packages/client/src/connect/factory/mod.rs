//! Socket factory capabilities
//!
//! [`SocketFactory`] creates connected sockets from addressing information.
//! [`SecureSocketFactory`] additionally layers TLS over an existing stream.
//! Wrappers such as [`ProtocolRestrictingFactory`] hold one factory and
//! implement the same traits themselves.

pub mod plain;
pub mod restricting;
pub mod secure;

use std::fmt;
use std::net::{IpAddr, TcpStream};

use crate::config::ConnectionParams;
use crate::connect::types::Socket;
use crate::error::Result;

pub use plain::PlainSocketFactory;
pub use restricting::ProtocolRestrictingFactory;
pub use secure::RustlsSocketFactory;

/// Creates connected sockets.
pub trait SocketFactory: fmt::Debug + Send + Sync {
    /// Connect to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn create_socket(&self, host: &str, port: u16) -> Result<Socket>;

    /// Connect to `host:port` from `local_address:local_port`.
    ///
    /// `None` binds the unspecified address, port zero lets the OS choose.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or connecting fails.
    fn create_socket_bound(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
    ) -> Result<Socket>;

    /// Connect as [`create_socket_bound`](Self::create_socket_bound) does,
    /// with explicit connection parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if binding, connecting or configuring the socket fails.
    fn create_socket_with_params(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        local_port: u16,
        params: &ConnectionParams,
    ) -> Result<Socket>;

    /// Convert into a secure factory, or get `self` back if this factory
    /// cannot create secure sockets.
    ///
    /// # Errors
    ///
    /// Returns the factory unchanged when it is not secure.
    fn into_secure(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn SecureSocketFactory>, Box<dyn SocketFactory>>;
}

/// Creates TLS sockets, including over already-connected streams.
pub trait SecureSocketFactory: SocketFactory {
    /// Layer TLS for `host:port` over an existing connection.
    ///
    /// With `auto_close`, closing the returned socket also closes `socket`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS layer cannot be created.
    fn create_layered_socket(
        &self,
        socket: TcpStream,
        host: &str,
        port: u16,
        auto_close: bool,
    ) -> Result<Socket>;
}
