//! CSR generation and HTTPS certificate import
//!
//! The action targets are not at fixed locations. They are found by walking
//! from the first manager through the vendor's security service to its
//! HttpsCert resource.

use redfish_core::{Capability, CsrSubject};
use tracing::{info, instrument};

use crate::client::RedfishClient;
use crate::error::{RedfishClientError, Result};
use crate::vendor::adapter_for;

impl RedfishClient {
    /// Ask the service processor to generate a certificate signing request.
    ///
    /// The subject is validated against the vendor's rules before anything
    /// is sent. Generation may take a while; poll with [`fetch_csr`].
    ///
    /// [`fetch_csr`]: RedfishClient::fetch_csr
    #[instrument(skip(self, subject), fields(cn = %subject.common_name))]
    pub async fn generate_csr(&mut self, subject: &CsrSubject) -> Result<()> {
        self.require_session()?;
        let flavor = self
            .require_capability(Capability::SecurityService, "CSR generation")
            .await?;
        let adapter = adapter_for(flavor);

        let manager = self.first_manager().await?;
        adapter.generate_csr(self, &manager, subject).await?;

        info!("CSR generation requested");
        Ok(())
    }

    /// PEM encoded CSR.
    ///
    /// Returns [`RedfishClientError::CsrNotAvailable`] both when none was
    /// requested and when generation is still running.
    #[instrument(skip(self))]
    pub async fn fetch_csr(&mut self) -> Result<String> {
        self.require_session()?;
        let flavor = self
            .require_capability(Capability::SecurityService, "CSR generation")
            .await?;
        let adapter = adapter_for(flavor);

        let manager = self.first_manager().await?;
        adapter.fetch_csr(self, &manager).await
    }

    /// Install a PEM encoded server certificate
    #[instrument(skip(self, pem))]
    pub async fn import_certificate(&mut self, pem: &str) -> Result<()> {
        if pem.trim().is_empty() {
            return Err(RedfishClientError::InvalidRequest("certificate is empty".into()));
        }
        self.require_session()?;
        let flavor = self
            .require_capability(Capability::SecurityService, "Certificate import")
            .await?;
        let adapter = adapter_for(flavor);

        let manager = self.first_manager().await?;
        adapter.import_certificate(self, &manager, pem).await?;

        info!("Certificate imported");
        Ok(())
    }
}
