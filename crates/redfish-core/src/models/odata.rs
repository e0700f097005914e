//! OData plumbing shared by every resource

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// `{"@odata.id": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataLink {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: Option<String>,
}

impl ODataLink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            odata_id: Some(id.into()),
        }
    }

    /// Link target, treating an empty string as absent
    pub fn target(&self) -> Option<&str> {
        self.odata_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Target of an optional link field
pub fn link_target(link: &Option<ODataLink>) -> Option<&str> {
    link.as_ref().and_then(ODataLink::target)
}

/// Hypermedia collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Members", default)]
    pub members: Vec<ODataLink>,

    #[serde(
        rename = "Members@odata.count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub members_count: Option<u64>,
}

impl Collection {
    /// Member locations of a collection the standard guarantees to be populated.
    pub fn member_ids(&self, url: &str) -> ModelResult<Vec<String>> {
        if self.members.is_empty() {
            return Err(ModelError::Integrity(format!(
                "collection {} has no Members",
                url
            )));
        }

        self.members
            .iter()
            .map(|member| {
                member.target().map(str::to_string).ok_or_else(|| {
                    ModelError::Integrity(format!(
                        "member of collection {} has no @odata.id",
                        url
                    ))
                })
            })
            .collect()
    }
}

/// Health status block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub health_rollup: Option<String>,
}

/// Action declaration: `{"target": ..., "@Redfish.ActionInfo": ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    #[serde(default)]
    pub target: Option<String>,

    #[serde(rename = "@Redfish.ActionInfo", default)]
    pub action_info: Option<String>,
}

impl LinkTarget {
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.is_empty())
    }

    pub fn action_info(&self) -> Option<&str> {
        self.action_info.as_deref().filter(|t| !t.is_empty())
    }
}

/// ActionInfo resource describing the parameters of an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionInfo {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub allowable_values: Vec<String>,
}

/// Service root document (`/redfish/v1/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRoot {
    #[serde(default)]
    pub redfish_version: Option<String>,
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub account_service: Option<ODataLink>,
    #[serde(default)]
    pub chassis: Option<ODataLink>,
    #[serde(default)]
    pub managers: Option<ODataLink>,
    #[serde(default)]
    pub session_service: Option<ODataLink>,
    #[serde(default)]
    pub systems: Option<ODataLink>,
    #[serde(default)]
    pub links: Option<ServiceRootLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRootLinks {
    #[serde(default)]
    pub sessions: Option<ODataLink>,
}

/// Locations discovered from the service root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    /// Absent on vendors without account management
    pub account_service: Option<String>,
    pub chassis: String,
    pub managers: String,
    pub session_service: String,
    /// Session collection shortcut from `Links.Sessions`
    pub sessions: Option<String>,
    pub systems: String,
}

impl ServiceRoot {
    /// Extract the endpoints, failing if a mandatory one is missing.
    pub fn endpoints(&self) -> ModelResult<ServiceEndpoints> {
        let required = |link: &Option<ODataLink>, name: &str| {
            link_target(link).map(str::to_string).ok_or_else(|| {
                ModelError::Integrity(format!("service root does not define {}", name))
            })
        };

        Ok(ServiceEndpoints {
            account_service: link_target(&self.account_service).map(str::to_string),
            chassis: required(&self.chassis, "Chassis")?,
            managers: required(&self.managers, "Managers")?,
            session_service: required(&self.session_service, "SessionService")?,
            sessions: self
                .links
                .as_ref()
                .and_then(|links| link_target(&links.sessions))
                .map(str::to_string),
            systems: required(&self.systems, "Systems")?,
        })
    }
}

/// SessionService resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionServiceInfo {
    #[serde(default)]
    pub service_enabled: Option<bool>,
    #[serde(default)]
    pub session_timeout: Option<u64>,
    #[serde(default)]
    pub sessions: Option<ODataLink>,
}
