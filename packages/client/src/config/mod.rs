//! Configuration for socket factories
//!
//! Supports both fixed configuration resolved at construction and dynamic
//! sources re-read on every socket creation.

pub mod connection;
pub mod factory;
pub mod properties;
pub mod protocols;

pub use connection::ConnectionParams;
pub use factory::FactoryConfig;
pub use properties::HTTPS_PROTOCOLS_KEY;
pub use protocols::{
    ProtocolSource, ResolveMode, RestrictionConfig, SharedProtocols, ValidationMode,
};
