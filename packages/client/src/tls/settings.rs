//! Shared TLS client settings
//!
//! [`TlsSettings`] holds everything needed to build a rustls `ClientConfig`
//! except the protocol versions, which are chosen per socket right before its
//! handshake.

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore, SupportedProtocolVersion};
use serde::{Deserialize, Serialize};

use super::errors::TlsError;
use super::versions::ProtocolVersion;

/// Serializable description of the trust roots and client options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Load the platform's native root certificates
    pub use_system_certs: bool,
    /// Include the Mozilla roots bundled with `webpki-roots`
    pub use_webpki_roots: bool,
    /// Additional PEM-encoded root certificates
    pub custom_root_certs: Vec<String>,
    /// Files containing PEM-encoded root certificates
    pub root_cert_files: Vec<PathBuf>,
    /// ALPN protocols offered during the handshake, in preference order
    pub alpn_protocols: Vec<String>,
    /// Send the server name indication extension
    pub enable_sni: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            use_system_certs: false,
            use_webpki_roots: true,
            custom_root_certs: Vec::new(),
            root_cert_files: Vec::new(),
            alpn_protocols: Vec::new(),
            enable_sni: true,
        }
    }
}

/// Runtime TLS settings shared by every socket a factory creates.
#[derive(Debug, Clone)]
pub struct TlsSettings {
    provider: Arc<CryptoProvider>,
    roots: Arc<RootCertStore>,
    alpn_protocols: Vec<Vec<u8>>,
    enable_sni: bool,
}

impl TlsSettings {
    /// Settings trusting exactly `roots`, using the ring provider.
    #[must_use]
    pub fn with_roots(roots: RootCertStore) -> Self {
        Self {
            provider: Arc::new(rustls::crypto::ring::default_provider()),
            roots: Arc::new(roots),
            alpn_protocols: Vec::new(),
            enable_sni: true,
        }
    }

    /// Build settings from configuration, assembling the root store.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::CertificateParsing`] when a configured PEM
    /// certificate or file cannot be read or parsed.
    pub fn from_config(config: &TlsConfig) -> Result<Self, TlsError> {
        let roots = build_root_store(config)?;
        let mut settings = Self::with_roots(roots);
        settings.alpn_protocols = config
            .alpn_protocols
            .iter()
            .map(|p| p.as_bytes().to_vec())
            .collect();
        settings.enable_sni = config.enable_sni;
        Ok(settings)
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<CryptoProvider>) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn with_alpn_protocols(mut self, protocols: Vec<Vec<u8>>) -> Self {
        self.alpn_protocols = protocols;
        self
    }

    /// Trust additional root certificates.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::CertificateParsing`] for a certificate rustls
    /// cannot use as a trust anchor.
    pub fn add_root_certificates<I>(&mut self, certs: I) -> Result<(), TlsError>
    where
        I: IntoIterator<Item = CertificateDer<'static>>,
    {
        let roots = Arc::make_mut(&mut self.roots);
        for cert in certs {
            add_root(roots, cert)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn roots(&self) -> &RootCertStore {
        &self.roots
    }

    /// Protocol names the crypto provider has cipher suites for, newest first.
    #[must_use]
    pub fn supported_protocols(&self) -> Vec<String> {
        ProtocolVersion::SUPPORTED
            .iter()
            .filter(|version| {
                version.as_rustls().is_some_and(|v| {
                    self.provider
                        .cipher_suites
                        .iter()
                        .any(|suite| suite.version() == v)
                })
            })
            .map(|version| version.name().to_string())
            .collect()
    }

    /// Build a client configuration limited to `versions`.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::Config`] when rustls rejects the version set, for
    /// example because it is empty.
    pub fn client_config(
        &self,
        versions: &[&'static SupportedProtocolVersion],
    ) -> Result<Arc<ClientConfig>, TlsError> {
        let mut config = ClientConfig::builder_with_provider(self.provider.clone())
            .with_protocol_versions(versions)
            .map_err(TlsError::Config)?
            .with_root_certificates(self.roots.clone())
            .with_no_client_auth();

        config.alpn_protocols.clone_from(&self.alpn_protocols);
        config.enable_sni = self.enable_sni;
        Ok(Arc::new(config))
    }
}

fn build_root_store(config: &TlsConfig) -> Result<RootCertStore, TlsError> {
    let mut root_store = RootCertStore::empty();

    if config.use_system_certs {
        let cert_result = rustls_native_certs::load_native_certs();
        for cert in cert_result.certs {
            if let Err(e) = root_store.add(cert) {
                tracing::warn!("Failed to add system certificate: {}", e);
            }
        }
        for err in &cert_result.errors {
            tracing::warn!("Certificate load error: {}", err);
        }
        tracing::debug!("Loaded {} system certificates", root_store.len());
    }

    if config.use_webpki_roots {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    for cert_pem in &config.custom_root_certs {
        for cert in parse_pem_certificates(cert_pem.as_bytes())? {
            add_root(&mut root_store, cert)?;
        }
    }

    for path in &config.root_cert_files {
        let pem = std::fs::read(path).map_err(|e| {
            TlsError::CertificateParsing(format!("failed to read {}: {e}", path.display()))
        })?;
        for cert in parse_pem_certificates(&pem)? {
            add_root(&mut root_store, cert)?;
        }
    }

    Ok(root_store)
}

/// Parse every certificate in a PEM bundle.
///
/// # Errors
///
/// Returns [`TlsError::CertificateParsing`] when the bundle is malformed or
/// holds no certificate.
pub fn parse_pem_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let mut reader = BufReader::new(pem);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::CertificateParsing(e.to_string()))?;

    if certs.is_empty() {
        return Err(TlsError::CertificateParsing(
            "no certificate found in PEM data".to_string(),
        ));
    }
    Ok(certs)
}

fn add_root(root_store: &mut RootCertStore, cert: CertificateDer<'static>) -> Result<(), TlsError> {
    root_store
        .add(cert)
        .map_err(|e| TlsError::CertificateParsing(format!("rejected root certificate: {e}")))?;
    tracing::debug!("Added custom root certificate");
    Ok(())
}
