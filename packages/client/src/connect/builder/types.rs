//! Core `SocketFactoryBuilder` struct and configuration methods

use std::time::Duration;

use rustls::pki_types::CertificateDer;

use crate::config::{
    ConnectionParams, FactoryConfig, ProtocolSource, ResolveMode, RestrictionConfig,
    SharedProtocols, ValidationMode,
};
use crate::tls::TlsConfig;

/// Builder for rustls socket factories and their protocol-restricting wrapper
#[derive(Clone, Debug)]
pub struct SocketFactoryBuilder {
    pub(super) tls: TlsConfig,
    pub(super) extra_roots: Vec<CertificateDer<'static>>,
    pub(super) params: ConnectionParams,
    pub(super) restriction: RestrictionConfig,
}

impl SocketFactoryBuilder {
    /// Create a new builder with default settings
    ///
    /// Trusts the bundled webpki roots and reads the protocol list from the
    /// `https.protocols` property on every socket creation.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(FactoryConfig::default())
    }

    /// Start from a loaded configuration.
    #[must_use]
    pub fn from_config(config: FactoryConfig) -> Self {
        Self {
            tls: config.tls,
            extra_roots: Vec::new(),
            params: config.connection,
            restriction: config.restriction,
        }
    }

    /// Sets the timeout for each connect attempt.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.params.connect_timeout = Some(timeout);
        self
    }

    /// Sets the read/write timeout of established sockets.
    #[must_use]
    pub fn so_timeout(mut self, timeout: Duration) -> Self {
        self.params.so_timeout = Some(timeout);
        self
    }

    /// Enables or disables `TCP_NODELAY` for connections.
    #[must_use]
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.params.tcp_nodelay = nodelay;
        self
    }

    /// Replace all connection parameters.
    #[must_use]
    pub fn connection_params(mut self, params: ConnectionParams) -> Self {
        self.params = params;
        self
    }

    /// Load the platform's native root certificates.
    #[must_use]
    pub fn use_system_certs(mut self, enabled: bool) -> Self {
        self.tls.use_system_certs = enabled;
        self
    }

    /// Include the bundled webpki roots.
    #[must_use]
    pub fn use_webpki_roots(mut self, enabled: bool) -> Self {
        self.tls.use_webpki_roots = enabled;
        self
    }

    /// Trust an additional DER-encoded root certificate.
    #[must_use]
    pub fn add_root_certificate(mut self, cert: CertificateDer<'static>) -> Self {
        self.extra_roots.push(cert);
        self
    }

    /// Trust additional PEM-encoded root certificates.
    #[must_use]
    pub fn add_root_certificate_pem(mut self, pem: impl Into<String>) -> Self {
        self.tls.custom_root_certs.push(pem.into());
        self
    }

    /// Offer these ALPN protocols, in preference order.
    #[must_use]
    pub fn alpn_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tls.alpn_protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Always enable exactly this comma-separated protocol list.
    #[must_use]
    pub fn protocols(self, protocols: impl Into<String>) -> Self {
        self.protocol_source(ProtocolSource::fixed(protocols))
    }

    /// Read the protocol list from a property in the process-wide store.
    #[must_use]
    pub fn protocols_from_property(self, key: impl Into<String>) -> Self {
        self.protocol_source(ProtocolSource::property(key))
    }

    /// Read the protocol list from an environment variable.
    #[must_use]
    pub fn protocols_from_env(self, var: impl Into<String>) -> Self {
        self.protocol_source(ProtocolSource::environment(var))
    }

    /// Read the protocol list from a handle the application keeps.
    #[must_use]
    pub fn shared_protocols(self, shared: SharedProtocols) -> Self {
        self.protocol_source(ProtocolSource::Shared(shared))
    }

    /// Never restrict; sockets keep the delegate's defaults.
    #[must_use]
    pub fn unrestricted(self) -> Self {
        self.protocol_source(ProtocolSource::Unrestricted)
    }

    #[must_use]
    pub fn protocol_source(mut self, source: ProtocolSource) -> Self {
        self.restriction.source = source;
        self
    }

    /// Read the protocol source once when building instead of per socket.
    #[must_use]
    pub fn resolve_once(mut self) -> Self {
        self.restriction.resolve = ResolveMode::Once;
        self
    }

    /// Check protocol names up front instead of at handshake time.
    #[must_use]
    pub fn eager_validation(mut self) -> Self {
        self.restriction.validation = ValidationMode::Eager;
        self
    }
}

impl Default for SocketFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
