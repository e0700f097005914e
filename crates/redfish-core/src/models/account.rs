//! AccountService, accounts and roles

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::odata::ODataLink;
use crate::oem::hp::HpPrivileges;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountService {
    #[serde(default)]
    pub service_enabled: Option<bool>,
    #[serde(default)]
    pub min_password_length: Option<u32>,
    #[serde(default)]
    pub max_password_length: Option<u32>,
    #[serde(default)]
    pub accounts: Option<ODataLink>,
    /// Absent on vendors using a private privilege model
    #[serde(default)]
    pub roles: Option<ODataLink>,
}

/// ManagerAccount resource.
///
/// `user_name` distinguishes an empty string (an unused account slot) from
/// an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub oem: Option<Value>,

    #[serde(skip)]
    pub self_endpoint: Option<String>,
}

impl Account {
    /// Unused slot on vendors with a fixed number of accounts
    pub fn is_empty_slot(&self) -> bool {
        self.user_name.as_deref() == Some("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_predefined: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_privileges: Vec<String>,
    #[serde(default)]
    pub oem_privileges: Vec<String>,

    #[serde(skip)]
    pub self_endpoint: Option<String>,
}

/// Caller-side description of an account to create or modify.
///
/// Unset fields are left untouched on modification. Vendors with a private
/// privilege model read `virtual_role` and `privileges` instead of `role`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub enabled: Option<bool>,
    pub locked: Option<bool>,
    /// Named privilege preset: none, readonly, operator, administrator
    pub virtual_role: Option<String>,
    /// Extra privilege bits, unioned with the virtual role
    pub privileges: Option<HpPrivileges>,
}

impl AccountRequest {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_virtual_role(mut self, role: impl Into<String>) -> Self {
        self.virtual_role = Some(role.into());
        self
    }

    pub fn with_privileges(mut self, privileges: HpPrivileges) -> Self {
        self.privileges = Some(privileges);
        self
    }
}

impl fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRequest")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("enabled", &self.enabled)
            .field("locked", &self.locked)
            .field("virtual_role", &self.virtual_role)
            .field("privileges", &self.privileges)
            .finish()
    }
}
