use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::odata::{ODataLink, Status};

/// Chassis resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Chassis {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chassis_type: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub asset_tag: Option<String>,
    #[serde(rename = "IndicatorLED", default)]
    pub indicator_led: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    /// Thermal telemetry, decoded by callers via `fetch_entity`
    #[serde(default)]
    pub thermal: Option<ODataLink>,
    /// Power telemetry, decoded by callers via `fetch_entity`
    #[serde(default)]
    pub power: Option<ODataLink>,
    #[serde(default)]
    pub oem: Option<Value>,

    #[serde(skip)]
    pub self_endpoint: Option<String>,
}
