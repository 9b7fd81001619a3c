//! Protocol version names and their rustls counterparts
//!
//! Protocol lists are carried around as plain strings (`"TLSv1.2"`) so a
//! misspelled or retired name is only rejected once a handshake is attempted.

use std::fmt;
use std::str::FromStr;

use rustls::SupportedProtocolVersion;

use super::errors::TlsError;

/// Separator between entries of a protocol list value.
pub const PROTOCOLS_SEPARATOR: char = ',';

/// TLS/SSL protocol versions known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    Ssl3,
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl ProtocolVersion {
    /// Versions rustls can negotiate, newest first.
    pub const SUPPORTED: [ProtocolVersion; 2] = [ProtocolVersion::Tls13, ProtocolVersion::Tls12];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProtocolVersion::Ssl3 => "SSLv3",
            ProtocolVersion::Tls10 => "TLSv1",
            ProtocolVersion::Tls11 => "TLSv1.1",
            ProtocolVersion::Tls12 => "TLSv1.2",
            ProtocolVersion::Tls13 => "TLSv1.3",
        }
    }

    /// The rustls version, or `None` for versions rustls refuses to speak.
    #[must_use]
    pub fn as_rustls(self) -> Option<&'static SupportedProtocolVersion> {
        match self {
            ProtocolVersion::Tls12 => Some(&rustls::version::TLS12),
            ProtocolVersion::Tls13 => Some(&rustls::version::TLS13),
            ProtocolVersion::Ssl3 | ProtocolVersion::Tls10 | ProtocolVersion::Tls11 => None,
        }
    }

    /// Map a negotiated rustls version back to its name.
    #[must_use]
    pub fn from_rustls(version: rustls::ProtocolVersion) -> Option<ProtocolVersion> {
        match version {
            rustls::ProtocolVersion::SSLv3 => Some(ProtocolVersion::Ssl3),
            rustls::ProtocolVersion::TLSv1_0 => Some(ProtocolVersion::Tls10),
            rustls::ProtocolVersion::TLSv1_1 => Some(ProtocolVersion::Tls11),
            rustls::ProtocolVersion::TLSv1_2 => Some(ProtocolVersion::Tls12),
            rustls::ProtocolVersion::TLSv1_3 => Some(ProtocolVersion::Tls13),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProtocolVersion {
    type Err = TlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSLv3" => Ok(ProtocolVersion::Ssl3),
            "TLSv1" => Ok(ProtocolVersion::Tls10),
            "TLSv1.1" => Ok(ProtocolVersion::Tls11),
            "TLSv1.2" => Ok(ProtocolVersion::Tls12),
            "TLSv1.3" => Ok(ProtocolVersion::Tls13),
            other => Err(TlsError::UnknownProtocol(other.to_string())),
        }
    }
}

/// Split a protocol list value into its entries.
///
/// Every separator splits and entries are not trimmed. Trailing empty entries
/// are dropped, but a value without any separator is returned as its single
/// entry, so `""` yields `[""]`.
#[must_use]
pub fn split_protocols(value: &str) -> Vec<String> {
    if !value.contains(PROTOCOLS_SEPARATOR) {
        return vec![value.to_string()];
    }

    let mut protocols: Vec<String> = value
        .split(PROTOCOLS_SEPARATOR)
        .map(str::to_string)
        .collect();
    while protocols.last().is_some_and(String::is_empty) {
        protocols.pop();
    }
    protocols
}

/// Resolve protocol names to the rustls versions they enable.
///
/// # Errors
///
/// Returns [`TlsError::UnknownProtocol`] for a name that is not a TLS/SSL
/// version and [`TlsError::UnsupportedProtocol`] for one rustls cannot speak.
pub fn resolve_protocols<S: AsRef<str>>(
    names: &[S],
) -> Result<Vec<&'static SupportedProtocolVersion>, TlsError> {
    let mut versions = Vec::with_capacity(names.len());
    for name in names {
        let version: ProtocolVersion = name.as_ref().parse()?;
        let supported = version
            .as_rustls()
            .ok_or_else(|| TlsError::UnsupportedProtocol(version.name().to_string()))?;
        if !versions.contains(&supported) {
            versions.push(supported);
        }
    }
    Ok(versions)
}
