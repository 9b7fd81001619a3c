//! TLS-specific error types for detailed error handling

/// TLS-specific error types for detailed error handling
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("unknown protocol name: {0:?}")]
    UnknownProtocol(String),
    #[error("protocol {0} is not supported by rustls")]
    UnsupportedProtocol(String),
    #[error("invalid server name {name}: {reason}")]
    InvalidServerName { name: String, reason: String },
    #[error("TLS configuration rejected: {0}")]
    Config(#[source] rustls::Error),
    #[error("certificate parsing failed: {0}")]
    CertificateParsing(String),
    #[error("handshake failed: {0}")]
    Handshake(#[source] std::io::Error),
    #[error("socket is closed")]
    Closed,
}
