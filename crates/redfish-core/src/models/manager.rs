use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::odata::{LinkTarget, Status};

/// Manager (service processor) resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manager {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manager_type: Option<String>,
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    /// Vendor extension block; carries security and license service links
    #[serde(default)]
    pub oem: Option<Value>,
    /// Kept raw because some vendors nest their actions under `Oem`
    #[serde(default)]
    pub actions: Option<Value>,

    #[serde(skip)]
    pub self_endpoint: Option<String>,
}

/// Standard manager actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerActions {
    #[serde(rename = "#Manager.Reset", default)]
    pub reset: Option<LinkTarget>,
}

/// Payload of `#Manager.Reset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerResetRequest<'a> {
    pub reset_type: &'a str,
}

impl ManagerResetRequest<'static> {
    pub fn force_restart() -> Self {
        Self {
            reset_type: "ForceRestart",
        }
    }
}

/// License installed on a service processor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub expiration: String,
    pub license_type: String,
    pub key: String,
}
