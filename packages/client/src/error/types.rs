use std::error::Error as StdError;
use std::fmt;

use super::BoxError;

/// A Result alias where the Err case is `tlspin_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur creating or using secure sockets.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    target: Option<String>,
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A caller supplied an argument the operation cannot accept
    InvalidArgument,
    /// Configuration could not be loaded or failed validation
    Config,
    /// TCP connection establishment failed
    Connect,
    /// The TLS handshake could not be started or completed
    Handshake,
    /// I/O on an established socket failed
    Io,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                target: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Attach the `host:port` the failing operation was aimed at.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_target(mut self, host: &str, port: u16) -> Error {
        self.inner.target = Some(format!("{host}:{port}"));
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The `host:port` associated with this error, if any
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.inner.target.as_deref()
    }

    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.inner.kind == Kind::InvalidArgument
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        self.inner.kind == Kind::Config
    }

    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.inner.kind == Kind::Connect
    }

    #[must_use]
    pub fn is_handshake(&self) -> bool {
        self.inner.kind == Kind::Handshake
    }

    /// Downcast the source to a concrete error type.
    #[must_use]
    pub fn source_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.source.as_ref()?.downcast_ref::<E>()
    }

    /// Convert into an `io::Error` for `Read`/`Write` implementations.
    pub(crate) fn into_io(self) -> std::io::Error {
        let kind = match self.inner.kind {
            Kind::InvalidArgument | Kind::Config => std::io::ErrorKind::InvalidInput,
            Kind::Connect => std::io::ErrorKind::NotConnected,
            Kind::Handshake => std::io::ErrorKind::ConnectionAborted,
            Kind::Io => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, self)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("tlspin_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref target) = self.inner.target {
            f.field("target", target);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::InvalidArgument => f.write_str("invalid argument")?,
            Kind::Config => f.write_str("configuration error")?,
            Kind::Connect => f.write_str("connection error")?,
            Kind::Handshake => f.write_str("TLS handshake error")?,
            Kind::Io => f.write_str("socket I/O error")?,
        }

        if let Some(ref target) = self.inner.target {
            write!(f, " ({target})")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(Kind::Io).with(err)
    }
}

impl From<crate::tls::TlsError> for Error {
    fn from(err: crate::tls::TlsError) -> Self {
        Error::new(Kind::Handshake).with(err)
    }
}
