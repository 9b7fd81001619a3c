//! Sockets produced by socket factories
//!
//! A factory may return a plain TCP stream or a TLS socket. Only the TLS
//! variant exposes protocol version control.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

use super::tls_socket::TlsSocket;

/// A connected socket returned by a [`SocketFactory`](crate::connect::SocketFactory).
#[derive(Debug)]
pub enum Socket {
    /// Unencrypted TCP stream
    Plain(TcpStream),
    /// TLS socket with configurable enabled protocols
    Tls(TlsSocket),
}

impl Socket {
    #[must_use]
    pub fn is_tls(&self) -> bool {
        matches!(self, Socket::Tls(_))
    }

    #[must_use]
    pub fn as_tls(&self) -> Option<&TlsSocket> {
        match self {
            Socket::Tls(tls) => Some(tls),
            Socket::Plain(_) => None,
        }
    }

    #[must_use]
    pub fn as_tls_mut(&mut self) -> Option<&mut TlsSocket> {
        match self {
            Socket::Tls(tls) => Some(tls),
            Socket::Plain(_) => None,
        }
    }

    /// Take the TLS socket out, or get `self` back if it is plain.
    ///
    /// # Errors
    ///
    /// Returns the socket unchanged when it is [`Socket::Plain`].
    pub fn into_tls(self) -> Result<TlsSocket, Socket> {
        match self {
            Socket::Tls(tls) => Ok(tls),
            plain @ Socket::Plain(_) => Err(plain),
        }
    }

    /// Enabled protocols of a TLS socket; `None` for a plain one.
    #[must_use]
    pub fn enabled_protocols(&self) -> Option<&[String]> {
        self.as_tls().map(TlsSocket::enabled_protocols)
    }

    /// Remote address of the connection.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the peer address cannot be determined.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Socket::Plain(stream) => stream.peer_addr(),
            Socket::Tls(tls) => tls.peer_addr(),
        }
    }

    /// Local address of the connection.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the local address cannot be determined.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Socket::Plain(stream) => stream.local_addr(),
            Socket::Tls(tls) => tls.local_addr(),
        }
    }
}

impl From<TcpStream> for Socket {
    fn from(stream: TcpStream) -> Self {
        Socket::Plain(stream)
    }
}

impl From<TlsSocket> for Socket {
    fn from(tls: TlsSocket) -> Self {
        Socket::Tls(tls)
    }
}

impl Read for Socket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Socket::Plain(stream) => stream.read(buf),
            Socket::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Socket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Socket::Plain(stream) => stream.write(buf),
            Socket::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Socket::Plain(stream) => stream.flush(),
            Socket::Tls(tls) => tls.flush(),
        }
    }
}
