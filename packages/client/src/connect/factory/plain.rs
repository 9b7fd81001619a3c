//! Factory for unencrypted TCP sockets

use std::net::{IpAddr, TcpStream};

use super::{SecureSocketFactory, SocketFactory};
use crate::config::ConnectionParams;
use crate::connect::tcp::{configure_tcp_socket, connect_to_address_list, resolve_host_sync};
use crate::connect::types::Socket;
use crate::error::{self, Result};

/// Creates [`Socket::Plain`] connections. Not a secure factory.
#[derive(Debug, Clone, Default)]
pub struct PlainSocketFactory {
    params: ConnectionParams,
}

impl PlainSocketFactory {
    #[must_use]
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }
}

/// Resolve, connect and configure a TCP stream.
///
/// `params` are checked before any address is resolved.
pub(crate) fn open_stream(
    host: &str,
    port: u16,
    local_address: Option<IpAddr>,
    local_port: u16,
    params: &ConnectionParams,
) -> Result<TcpStream> {
    params
        .validate()
        .map_err(|e| error::invalid_argument(e).with_target(host, port))?;

    let stream = resolve_host_sync(host, port)
        .and_then(|addrs| {
            connect_to_address_list(&addrs, local_address, local_port, params.connect_timeout)
        })
        .map_err(|e| error::connect(e).with_target(host, port))?;

    configure_tcp_socket(&stream, params).map_err(|e| error::connect(e).with_target(host, port))?;
    Ok(stream)
}

impl SocketFactory for PlainSocketFactory {
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
        open_stream(host, port, local_address, local_port, params).map(Socket::Plain)
    }

    fn into_secure(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn SecureSocketFactory>, Box<dyn SocketFactory>> {
        Err(self)
    }
}
