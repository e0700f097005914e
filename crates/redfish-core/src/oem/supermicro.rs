//! Supermicro extensions

use serde::{Deserialize, Serialize};

use crate::models::LinkTarget;

/// Manager actions; Supermicro declares `#Manager.Reset` under `Oem`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupermicroManagerActions {
    #[serde(rename = "Oem", default)]
    pub oem: SupermicroManagerActionsOem,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupermicroManagerActionsOem {
    #[serde(rename = "#Manager.Reset", default)]
    pub reset: Option<LinkTarget>,
}
