//! ComputerSystem resource and its reset action

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::odata::{ActionInfo, Status};
use crate::error::{ModelError, ModelResult};

/// Name of the reset parameter used by `#ComputerSystem.Reset`
pub const RESET_TYPE_PROPERTY: &str = "ResetType";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct System {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub bios_version: Option<String>,
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub processor_summary: Option<ProcessorSummary>,
    #[serde(default)]
    pub memory_summary: Option<MemorySummary>,
    #[serde(default)]
    pub actions: Option<SystemActions>,
    /// Vendor extension block, interpreted by vendor adapters only
    #[serde(default)]
    pub oem: Option<Value>,

    #[serde(skip)]
    pub self_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorSummary {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemorySummary {
    #[serde(rename = "TotalSystemMemoryGiB", default)]
    pub total_system_memory_gib: Option<f64>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemActions {
    #[serde(rename = "#ComputerSystem.Reset", default)]
    pub reset: Option<ResetAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAction {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(rename = "ResetType@Redfish.AllowableValues", default)]
    pub allowable_values: Vec<String>,
    #[serde(rename = "@Redfish.ActionInfo", default)]
    pub action_info: Option<String>,
}

impl System {
    /// The declared `#ComputerSystem.Reset` action together with its target.
    pub fn reset_action(&self) -> ModelResult<(&ResetAction, &str)> {
        let actions = self.actions.as_ref().ok_or_else(|| {
            ModelError::Integrity("system does not define an Actions key".into())
        })?;
        let reset = actions.reset.as_ref().ok_or_else(|| {
            ModelError::Integrity("system Actions do not define #ComputerSystem.Reset".into())
        })?;
        let target = reset
            .target
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ModelError::Integrity("#ComputerSystem.Reset does not define a target".into())
            })?;
        Ok((reset, target))
    }
}

/// Reset operations a system accepts, keyed by lower-cased name.
///
/// Computed on demand; never stored inside the [`System`] it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedResetTypes {
    target: String,
    property: String,
    values: BTreeMap<String, String>,
}

impl AllowedResetTypes {
    pub fn new(
        target: impl Into<String>,
        property: impl Into<String>,
        values: impl IntoIterator<Item = String>,
    ) -> ModelResult<Self> {
        let values: BTreeMap<String, String> = values
            .into_iter()
            .map(|value| (value.to_lowercase(), value))
            .collect();

        if values.is_empty() {
            return Err(ModelError::Integrity(
                "list of supported reset types is not defined or empty".into(),
            ));
        }

        Ok(Self {
            target: target.into(),
            property: property.into(),
            values,
        })
    }

    /// From the allowable values declared inline on the action
    pub fn from_action(target: &str, action: &ResetAction) -> ModelResult<Self> {
        Self::new(target, RESET_TYPE_PROPERTY, action.allowable_values.clone())
    }

    /// From the `ResetType` parameter of an ActionInfo resource
    pub fn from_action_info(target: &str, info: &ActionInfo) -> ModelResult<Self> {
        let parameter = info
            .parameters
            .iter()
            .find(|p| p.name == RESET_TYPE_PROPERTY)
            .ok_or_else(|| {
                ModelError::Integrity(format!(
                    "ActionInfo does not describe a {} parameter",
                    RESET_TYPE_PROPERTY
                ))
            })?;
        Self::new(target, parameter.name.clone(), parameter.allowable_values.clone())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Vendor spelling of a requested reset type, matched case-insensitively
    pub fn lookup(&self, requested: &str) -> Option<&str> {
        self.values
            .get(&requested.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Vendor spellings in name order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.values().map(String::as_str)
    }
}
