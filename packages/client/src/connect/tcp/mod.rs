//! TCP connection utilities
//!
//! Resolution, connection establishment with optional local binding, and
//! socket option configuration.

pub mod basic_connection;
pub mod dns_resolution;
pub mod socket_config;

pub use basic_connection::connect_to_address_list;
pub use dns_resolution::resolve_host_sync;
pub use socket_config::configure_tcp_socket;
