//! Build logic for `SocketFactoryBuilder`

use super::types::SocketFactoryBuilder;
use crate::config::FactoryConfig;
use crate::connect::factory::{ProtocolRestrictingFactory, RustlsSocketFactory};
use crate::error::{self, Result};
use crate::tls::TlsSettings;

impl SocketFactoryBuilder {
    /// Build only the rustls factory, without protocol restriction.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when the
    /// connection parameters are invalid or a root certificate is rejected.
    pub fn build_rustls(&self) -> Result<RustlsSocketFactory> {
        self.params.validate().map_err(error::configuration)?;

        let mut settings = TlsSettings::from_config(&self.tls).map_err(error::configuration)?;
        settings
            .add_root_certificates(self.extra_roots.iter().cloned())
            .map_err(error::configuration)?;

        Ok(RustlsSocketFactory::new(settings, self.params.clone()))
    }

    /// Build the rustls factory wrapped in a [`ProtocolRestrictingFactory`].
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Config`](crate::error::Kind::Config) error when the
    /// configuration is invalid or eager validation rejects the list.
    pub fn build(self) -> Result<ProtocolRestrictingFactory> {
        let base = self.build_rustls()?;
        ProtocolRestrictingFactory::wrap(base, self.restriction)
    }

    /// The configuration this builder would produce, minus DER roots.
    #[must_use]
    pub fn to_config(&self) -> FactoryConfig {
        FactoryConfig {
            tls: self.tls.clone(),
            connection: self.params.clone(),
            restriction: self.restriction.clone(),
        }
    }
}
