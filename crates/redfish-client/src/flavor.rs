//! Vendor flavor resolution and the capability gate

use redfish_core::{Capability, Collection, Flavor, System};
use tracing::{info, instrument, warn};

use crate::client::RedfishClient;
use crate::error::{RedfishClientError, Result};

impl RedfishClient {
    /// Determine the vendor flavor from the first system's manufacturer.
    ///
    /// Memoized: once resolved, no further requests are made.
    #[instrument(skip(self))]
    pub async fn resolve_flavor(&mut self) -> Result<Flavor> {
        if self.flavor.is_resolved() {
            return Ok(self.flavor);
        }

        let systems_url = self.required_endpoints()?.systems.clone();
        let systems: Collection = self.get_json(&systems_url).await?;
        let first = systems
            .member_ids(&systems_url)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RedfishClientError::integrity(format!("collection {} has no Members", systems_url))
            })?;
        let system: System = self.get_json(&first).await?;

        let flavor = match system.manufacturer.as_deref() {
            Some(manufacturer) => Flavor::from_manufacturer(manufacturer, system.oem.as_ref())?,
            None => {
                warn!(system = %first, "System reports no Manufacturer, assuming generic");
                Flavor::Generic
            }
        };

        info!(%flavor, "Vendor flavor resolved");
        self.flavor = flavor;
        Ok(flavor)
    }

    /// Resolve the flavor and reject `operation` unless it has `capability`.
    ///
    /// A rejection is decided from the flavor alone; it never costs a
    /// request beyond resolution.
    pub(crate) async fn require_capability(
        &mut self,
        capability: Capability,
        operation: &str,
    ) -> Result<Flavor> {
        let flavor = self.resolve_flavor().await?;
        if flavor.supports(capability) {
            Ok(flavor)
        } else {
            Err(RedfishClientError::unsupported(flavor, operation))
        }
    }

    /// Whether the resolved flavor supports `capability`
    pub async fn supports(&mut self, capability: Capability) -> Result<bool> {
        Ok(self.resolve_flavor().await?.supports(capability))
    }
}
