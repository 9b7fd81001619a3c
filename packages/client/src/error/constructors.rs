use super::BoxError;
use super::types::{Error, Kind};

/// Creates an `Error` for a rejected argument.
pub fn invalid_argument<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::InvalidArgument).with(e.into())
}

/// Creates an `Error` for invalid or unloadable configuration.
pub fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config).with(e.into())
}

/// Creates an `Error` for TCP connection establishment failures.
pub fn connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connect).with(e.into())
}

/// Creates an `Error` for TLS handshake failures.
pub fn handshake<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Handshake).with(e.into())
}

