//! Socket factories and the sockets they create
//!
//! Blocking, `std::net`-based connection establishment with rustls for TLS.

pub mod builder;
pub mod factory;
pub mod tcp;
pub mod types;

pub use builder::SocketFactoryBuilder;
pub use factory::{
    PlainSocketFactory, ProtocolRestrictingFactory, RustlsSocketFactory, SecureSocketFactory,
    SocketFactory,
};
pub use tcp::{configure_tcp_socket, connect_to_address_list, resolve_host_sync};
pub use types::{Socket, TlsSocket, server_name};
