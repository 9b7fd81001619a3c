//! tlspin prelude
//!
//! The types most callers need to create restricted TLS sockets.

pub use crate::config::{ConnectionParams, ProtocolSource, RestrictionConfig, SharedProtocols};
pub use crate::connect::{
    ProtocolRestrictingFactory, RustlsSocketFactory, SecureSocketFactory, Socket, SocketFactory,
    SocketFactoryBuilder, TlsSocket,
};
pub use crate::error::{Error, Result};
