//! Socket types
//!
//! - `socket`: the [`Socket`] returned by every factory
//! - `tls_socket`: TLS socket with deferred handshake and protocol control

pub mod socket;
pub mod tls_socket;

pub use socket::Socket;
pub use tls_socket::{TlsSocket, server_name};
