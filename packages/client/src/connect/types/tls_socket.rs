//! TLS socket with deferred handshake
//!
//! A [`TlsSocket`] is created over a connected TCP stream but does not start
//! the TLS handshake until [`TlsSocket::start_handshake`] is called or the
//! socket is first read from or written to. Until then its enabled protocol
//! versions can be changed freely.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};

use crate::error::{self, Error, Result};
use crate::tls::{ProtocolVersion, TlsError, TlsSettings, resolve_protocols};

type TlsStream = StreamOwned<ClientConnection, TcpStream>;

enum State {
    Pending(TcpStream),
    Established(Box<TlsStream>),
    Closed,
}

/// Client-side TLS socket whose protocol versions are configurable until the
/// handshake starts.
pub struct TlsSocket {
    state: State,
    server_name: ServerName<'static>,
    settings: Arc<TlsSettings>,
    enabled_protocols: Vec<String>,
    auto_close: bool,
}

/// Parse a host into the name used for SNI and certificate verification.
///
/// # Errors
///
/// Returns an invalid-argument error when `host` is neither a DNS name nor
/// an IP address.
pub fn server_name(host: &str) -> Result<ServerName<'static>> {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    ServerName::try_from(bare)
        .map(|name| name.to_owned())
        .map_err(|e| {
            error::invalid_argument(TlsError::InvalidServerName {
                name: host.to_string(),
                reason: e.to_string(),
            })
        })
}

impl TlsSocket {
    /// Wrap a connected stream. The handshake is deferred.
    ///
    /// The enabled protocols start out as every version `settings` supports.
    /// When `auto_close` is false, [`close`](Self::close) hands the TCP
    /// stream back instead of shutting it down.
    #[must_use]
    pub fn new(
        stream: TcpStream,
        server_name: ServerName<'static>,
        settings: Arc<TlsSettings>,
        auto_close: bool,
    ) -> Self {
        let enabled_protocols = settings.supported_protocols();
        Self {
            state: State::Pending(stream),
            server_name,
            settings,
            enabled_protocols,
            auto_close,
        }
    }

    /// Protocol names the next handshake will offer, in order.
    #[must_use]
    pub fn enabled_protocols(&self) -> &[String] {
        &self.enabled_protocols
    }

    /// Replace the enabled protocols.
    ///
    /// Names are not checked here. Unknown or unsupported names make the
    /// handshake fail.
    pub fn set_enabled_protocols<I, S>(&mut self, protocols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_protocols = protocols.into_iter().map(Into::into).collect();
        if matches!(self.state, State::Established(_)) {
            tracing::debug!(
                "Enabled protocols changed after handshake with {:?}; the established session is unaffected",
                self.server_name
            );
        }
    }

    /// Protocol names the underlying TLS implementation can negotiate.
    #[must_use]
    pub fn supported_protocols(&self) -> Vec<String> {
        self.settings.supported_protocols()
    }

    #[must_use]
    pub fn server_name(&self) -> &ServerName<'static> {
        &self.server_name
    }

    #[must_use]
    pub fn is_auto_close(&self) -> bool {
        self.auto_close
    }

    #[must_use]
    pub fn is_handshake_complete(&self) -> bool {
        matches!(self.state, State::Established(_))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Version agreed during the handshake.
    #[must_use]
    pub fn negotiated_protocol(&self) -> Option<ProtocolVersion> {
        match &self.state {
            State::Established(stream) => stream
                .conn
                .protocol_version()
                .and_then(ProtocolVersion::from_rustls),
            _ => None,
        }
    }

    /// ALPN protocol agreed during the handshake.
    #[must_use]
    pub fn alpn_protocol(&self) -> Option<&[u8]> {
        match &self.state {
            State::Established(stream) => stream.conn.alpn_protocol(),
            _ => None,
        }
    }

    /// The underlying TCP stream, unless the socket is closed.
    #[must_use]
    pub fn tcp_stream(&self) -> Option<&TcpStream> {
        match &self.state {
            State::Pending(stream) => Some(stream),
            State::Established(stream) => Some(&stream.sock),
            State::Closed => None,
        }
    }

    /// Remote address of the underlying TCP stream.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` once the socket is closed.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.tcp_stream()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?
            .peer_addr()
    }

    /// Local address of the underlying TCP stream.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` once the socket is closed.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.tcp_stream()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?
            .local_addr()
    }

    /// Run the handshake now with the enabled protocols.
    ///
    /// Does nothing when the handshake already completed. On failure the
    /// socket is closed.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Handshake`](crate::error::Kind::Handshake) error when
    /// an enabled protocol is unknown or unsupported, when rustls rejects the
    /// protocol set, or when the peer handshake fails.
    pub fn start_handshake(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Established(stream) => {
                self.state = State::Established(stream);
                Ok(())
            }
            State::Closed => Err(error::handshake(TlsError::Closed)),
            State::Pending(stream) => {
                let stream = self.handshake(stream)?;
                self.state = State::Established(Box::new(stream));
                Ok(())
            }
        }
    }

    fn handshake(&self, mut sock: TcpStream) -> Result<TlsStream> {
        let versions = resolve_protocols(&self.enabled_protocols)?;
        let config = self.settings.client_config(&versions)?;
        let mut conn = ClientConnection::new(config, self.server_name.clone())
            .map_err(|e| error::handshake(TlsError::Config(e)))?;

        while conn.is_handshaking() {
            conn.complete_io(&mut sock)
                .map_err(|e| error::handshake(TlsError::Handshake(e)))?;
        }

        tracing::debug!(
            "TLS handshake with {:?} complete: {:?}",
            self.server_name,
            conn.protocol_version()
        );
        Ok(StreamOwned::new(conn, sock))
    }

    fn established(&mut self) -> io::Result<&mut TlsStream> {
        self.start_handshake().map_err(Error::into_io)?;
        match &mut self.state {
            State::Established(stream) => Ok(stream.as_mut()),
            _ => Err(io::Error::from(io::ErrorKind::NotConnected)),
        }
    }

    /// Close the socket, sending `close_notify` if the handshake completed.
    ///
    /// Returns the TCP stream when the socket was created without
    /// auto-close; otherwise the stream is shut down and `None` returned.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while flushing `close_notify` or shutting
    /// the stream down.
    pub fn close(mut self) -> io::Result<Option<TcpStream>> {
        let sock = match std::mem::replace(&mut self.state, State::Closed) {
            State::Established(stream) => {
                let mut stream = *stream;
                stream.conn.send_close_notify();
                while stream.conn.wants_write() {
                    stream.conn.write_tls(&mut stream.sock)?;
                }
                stream.sock
            }
            State::Pending(sock) => sock,
            State::Closed => return Ok(None),
        };

        if !self.auto_close {
            return Ok(Some(sock));
        }

        match sock.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(None),
        }
    }
}

impl fmt::Debug for TlsSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Pending(_) => "pending",
            State::Established(_) => "established",
            State::Closed => "closed",
        };
        f.debug_struct("TlsSocket")
            .field("server_name", &self.server_name)
            .field("state", &state)
            .field("enabled_protocols", &self.enabled_protocols)
            .field("auto_close", &self.auto_close)
            .finish()
    }
}

impl Read for TlsSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.established()?.read(buf)
    }
}

impl Write for TlsSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.established()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.state {
            State::Established(stream) => stream.flush(),
            State::Pending(_) => Ok(()),
            State::Closed => Err(io::Error::from(io::ErrorKind::NotConnected)),
        }
    }
}
