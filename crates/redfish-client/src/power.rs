//! System power control and service processor reset

use redfish_core::{ActionInfo, AllowedResetTypes, ManagerResetRequest, System};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::client::{expect_status, RedfishClient};
use crate::error::{RedfishClientError, Result};
use crate::vendor::adapter_for;

/// Statuses accepted for reset actions
const RESET_ACCEPTED: &[u16] = &[200, 202, 204];

impl RedfishClient {
    /// Reset types `system` accepts.
    ///
    /// Computed afresh on every call; nothing is cached on the system.
    #[instrument(skip(self, system), fields(system = ?system.self_endpoint))]
    pub async fn allowed_reset_types(&self, system: &System) -> Result<AllowedResetTypes> {
        let (action, target) = system.reset_action()?;

        if action.allowable_values.is_empty() {
            if let Some(info_url) = action.action_info.as_deref().filter(|u| !u.is_empty()) {
                let info: ActionInfo = self.get_json(info_url).await?;
                return Ok(AllowedResetTypes::from_action_info(target, &info)?);
            }
        }
        Ok(AllowedResetTypes::from_action(target, action)?)
    }

    /// Request a power state change, e.g. `On`, `ForceOff`, `GracefulRestart`.
    ///
    /// `state` is matched case-insensitively against the reset types the
    /// system declares; an unknown state is rejected before any request.
    #[instrument(skip(self, system), fields(system = ?system.self_endpoint))]
    pub async fn set_system_power_state(&mut self, system: &System, state: &str) -> Result<()> {
        self.require_session()?;
        let allowed = self.allowed_reset_types(system).await?;

        let value = allowed.lookup(state).ok_or_else(|| {
            RedfishClientError::InvalidRequest(format!(
                "requested power state {} is not supported, supported are: {}",
                state,
                allowed.values().collect::<Vec<_>>().join(", ")
            ))
        })?;

        let mut payload = Map::new();
        payload.insert(allowed.property().to_string(), Value::from(value));

        let response = self
            .post_json(allowed.target(), &Value::Object(payload))
            .await?;
        expect_status("POST", response, RESET_ACCEPTED)?;

        info!(state = value, "Power state change requested");
        Ok(())
    }

    /// Force a restart of the service processor (the first manager)
    #[instrument(skip(self))]
    pub async fn reset_manager(&mut self) -> Result<()> {
        self.require_session()?;
        let flavor = self.resolve_flavor().await?;

        let manager = self.first_manager().await?;
        let target = adapter_for(flavor).manager_reset_target(&manager)?;
        self.post_manager_reset(&target).await
    }

    pub(crate) async fn post_manager_reset(&self, target: &str) -> Result<()> {
        let response = self
            .post_json(target, &ManagerResetRequest::force_restart())
            .await?;
        expect_status("POST", response, RESET_ACCEPTED)?;

        info!("Service processor reset requested");
        Ok(())
    }
}
