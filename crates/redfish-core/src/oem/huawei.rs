//! iBMC extensions

use serde::{Deserialize, Serialize};

use crate::models::{link_target, ODataLink};

/// `Oem.Huawei` block of a manager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HuaweiManagerOem {
    #[serde(rename = "BMCUpTime", default)]
    pub bmc_up_time: Option<String>,
    #[serde(rename = "ProductUniqueID", default)]
    pub product_unique_id: Option<String>,
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub security_service: Option<ODataLink>,
}

impl HuaweiManagerOem {
    pub fn security_service(&self) -> Option<&str> {
        link_target(&self.security_service)
    }
}
