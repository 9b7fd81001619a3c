//! # tlspin client
//!
//! Secure socket factories whose sockets negotiate only the TLS protocol
//! versions you allow.
//!
//! The central piece is [`ProtocolRestrictingFactory`], a wrapper around any
//! [`SecureSocketFactory`]. Every socket the wrapped factory creates has its
//! enabled protocols set from a comma-separated list (for example
//! `"TLSv1.2,TLSv1.3"`) before it is handed to the caller. The list comes
//! from a [`ProtocolSource`]: by default the `https.protocols` entry of the
//! process-wide [`properties`](config::properties) store, read on every call.
//!
//! ## Features
//!
//! - **Rustls TLS** with bundled or native root certificates
//! - **Deferred handshake** so protocol versions can be narrowed after creation
//! - **Four creation modes**: host/port, local binding, explicit parameters,
//!   and TLS layered over an existing connection
//! - **JSON configuration** through serde
//!
//! ## Usage
//!
//! ```no_run
//! use std::io::Write;
//!
//! use tlspin_client::{SocketFactory, SocketFactoryBuilder};
//!
//! # fn main() -> tlspin_client::Result<()> {
//! let factory = SocketFactoryBuilder::new().protocols("TLSv1.3").build()?;
//! let mut socket = factory.create_socket("example.com", 443)?;
//! socket.write_all(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod connect;
pub mod error;
pub mod prelude;
pub mod tls;

pub use config::{
    ConnectionParams, FactoryConfig, HTTPS_PROTOCOLS_KEY, ProtocolSource, ResolveMode,
    RestrictionConfig, SharedProtocols, ValidationMode,
};
pub use connect::{
    PlainSocketFactory, ProtocolRestrictingFactory, RustlsSocketFactory, SecureSocketFactory,
    Socket, SocketFactory, SocketFactoryBuilder, TlsSocket,
};
pub use error::{Error, Kind, Result};
pub use tls::{ProtocolVersion, TlsConfig, TlsError, TlsSettings};
