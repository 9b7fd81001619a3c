//! TLS settings, protocol names and TLS errors

pub mod errors;
pub mod settings;
pub mod versions;

pub use errors::TlsError;
pub use settings::{TlsConfig, TlsSettings, parse_pem_certificates};
pub use versions::{PROTOCOLS_SEPARATOR, ProtocolVersion, resolve_protocols, split_protocols};
