//! Service processor licensing

use redfish_core::{Capability, License, Manager};
use tracing::instrument;

use crate::client::RedfishClient;
use crate::error::{RedfishClientError, Result};
use crate::vendor::adapter_for;

const OPERATION: &str = "License management";

impl RedfishClient {
    /// License installed on `manager`, `None` if there is no license key
    #[instrument(skip(self, manager), fields(manager = ?manager.id))]
    pub async fn get_license(&mut self, manager: &Manager) -> Result<Option<License>> {
        self.require_session()?;
        let flavor = self.require_capability(Capability::License, OPERATION).await?;

        adapter_for(flavor).get_license(self, manager).await
    }

    #[instrument(skip(self, manager, key), fields(manager = ?manager.id))]
    pub async fn install_license(&mut self, manager: &Manager, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(RedfishClientError::InvalidRequest("license key is empty".into()));
        }
        self.require_session()?;
        let flavor = self.require_capability(Capability::License, OPERATION).await?;

        adapter_for(flavor).install_license(self, manager, key).await
    }
}
