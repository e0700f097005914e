//! iLO extensions shared by the HP and HPE flavors.
//!
//! Both generations use the same shapes; only the `Oem` key (`Hp` or `Hpe`)
//! and the action name prefixes differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::{link_target, License, ODataLink};

/// `Oem.<Hp|Hpe>` block of a manager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IloManagerOem {
    #[serde(rename = "Type", default)]
    pub oem_type: Option<String>,
    #[serde(default)]
    pub license: Option<IloLicense>,
    #[serde(default)]
    pub links: IloManagerLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IloManagerLinks {
    #[serde(default)]
    pub security_service: Option<ODataLink>,
    #[serde(default)]
    pub license_service: Option<ODataLink>,
    #[serde(default)]
    pub update_service: Option<ODataLink>,
}

impl IloManagerOem {
    pub fn security_service(&self) -> Option<&str> {
        link_target(&self.links.security_service)
    }

    pub fn license_service(&self) -> Option<&str> {
        link_target(&self.links.license_service)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IloLicense {
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub license_string: Option<String>,
    #[serde(default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub license_expire: Option<String>,
}

impl IloLicense {
    /// `None` when no key is installed
    pub fn to_license(&self, name: &str) -> Option<License> {
        let key = self.license_key.as_deref().filter(|k| !k.is_empty())?;
        Some(License {
            name: name.to_string(),
            expiration: self.license_expire.clone().unwrap_or_default(),
            license_type: self.license_type.clone().unwrap_or_default(),
            key: key.to_string(),
        })
    }
}

/// Payload for the iLO license service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseInstallRequest<'a> {
    pub license_key: &'a str,
}

/// iLO account privileges as a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HpPrivileges(u32);

impl HpPrivileges {
    pub const NONE: Self = Self(0);
    pub const LOGIN: Self = Self(1 << 0);
    pub const REMOTE_CONSOLE: Self = Self(1 << 1);
    pub const USER_CONFIG: Self = Self(1 << 2);
    pub const VIRTUAL_MEDIA: Self = Self(1 << 3);
    pub const VIRTUAL_POWER_AND_RESET: Self = Self(1 << 4);
    pub const ILO_CONFIG: Self = Self(1 << 5);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0x3f)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Render into the nested boolean map iLO expects
    pub fn to_map(self) -> HpPrivilegeMap {
        HpPrivilegeMap {
            login: self.contains(Self::LOGIN),
            remote_console: self.contains(Self::REMOTE_CONSOLE),
            user_config: self.contains(Self::USER_CONFIG),
            virtual_media: self.contains(Self::VIRTUAL_MEDIA),
            virtual_power_and_reset: self.contains(Self::VIRTUAL_POWER_AND_RESET),
            ilo_config: self.contains(Self::ILO_CONFIG),
        }
    }
}

impl std::ops::BitOr for HpPrivileges {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpPrivilegeMap {
    #[serde(rename = "LoginPriv")]
    pub login: bool,
    #[serde(rename = "RemoteConsolePriv")]
    pub remote_console: bool,
    #[serde(rename = "UserConfigPriv")]
    pub user_config: bool,
    #[serde(rename = "VirtualMediaPriv")]
    pub virtual_media: bool,
    #[serde(rename = "VirtualPowerAndResetPriv")]
    pub virtual_power_and_reset: bool,
    #[serde(rename = "iLOConfigPriv")]
    pub ilo_config: bool,
}

/// Named privilege presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualRole {
    None,
    ReadOnly,
    Operator,
    Administrator,
}

impl VirtualRole {
    pub fn privileges(&self) -> HpPrivileges {
        match self {
            Self::None => HpPrivileges::NONE,
            Self::ReadOnly => HpPrivileges::LOGIN,
            Self::Operator => {
                HpPrivileges::LOGIN
                    | HpPrivileges::REMOTE_CONSOLE
                    | HpPrivileges::VIRTUAL_MEDIA
                    | HpPrivileges::VIRTUAL_POWER_AND_RESET
            }
            Self::Administrator => {
                HpPrivileges::LOGIN
                    | HpPrivileges::REMOTE_CONSOLE
                    | HpPrivileges::USER_CONFIG
                    | HpPrivileges::VIRTUAL_MEDIA
                    | HpPrivileges::VIRTUAL_POWER_AND_RESET
                    | HpPrivileges::ILO_CONFIG
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ReadOnly => "readonly",
            Self::Operator => "operator",
            Self::Administrator => "administrator",
        }
    }
}

impl FromStr for VirtualRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "readonly" => Ok(Self::ReadOnly),
            "operator" => Ok(Self::Operator),
            "administrator" => Ok(Self::Administrator),
            other => Err(ModelError::InvalidRequest(format!(
                "unknown virtual role {}",
                other
            ))),
        }
    }
}

impl fmt::Display for VirtualRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Oem.<Hp|Hpe>` block of an account create or modify request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IloAccountOem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_name: Option<String>,
    pub privileges: HpPrivilegeMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_virtual_role_presets() {
        assert_eq!(VirtualRole::None.privileges().bits(), 0);
        assert_eq!(VirtualRole::ReadOnly.privileges().bits(), 0b000001);
        assert_eq!(VirtualRole::Operator.privileges().bits(), 0b011011);
        assert_eq!(VirtualRole::Administrator.privileges().bits(), 0b111111);
    }

    #[test]
    fn test_virtual_role_parsing() {
        assert_eq!("ReadOnly".parse::<VirtualRole>(), Ok(VirtualRole::ReadOnly));
        assert_eq!(
            " administrator ".parse::<VirtualRole>(),
            Ok(VirtualRole::Administrator)
        );
        assert!(matches!(
            "superuser".parse::<VirtualRole>(),
            Err(ModelError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_privilege_map_rendering() {
        let privileges = VirtualRole::ReadOnly.privileges() | HpPrivileges::VIRTUAL_MEDIA;
        assert_eq!(
            serde_json::to_value(privileges.to_map()).unwrap(),
            json!({
                "LoginPriv": true,
                "RemoteConsolePriv": false,
                "UserConfigPriv": false,
                "VirtualMediaPriv": true,
                "VirtualPowerAndResetPriv": false,
                "iLOConfigPriv": false
            })
        );
    }

    #[test]
    fn test_license_without_key_is_none() {
        let license = IloLicense {
            license_type: Some("Perpetual".into()),
            ..IloLicense::default()
        };
        assert_eq!(license.to_license("HP iLO license"), None);
    }

    #[test]
    fn test_manager_oem_links() {
        let oem: IloManagerOem = serde_json::from_value(json!({
            "Type": "HpiLO.1.1.0",
            "License": {
                "LicenseKey": "XXXXX-XXXXX-XXXXX-XXXXX-ABCDE",
                "LicenseString": "iLO Advanced",
                "LicenseType": "Perpetual"
            },
            "Links": {
                "SecurityService": {"@odata.id": "/redfish/v1/Managers/1/SecurityService/"},
                "LicenseService": {"@odata.id": "/redfish/v1/Managers/1/LicenseService/"}
            }
        }))
        .unwrap();

        assert_eq!(
            oem.security_service(),
            Some("/redfish/v1/Managers/1/SecurityService/")
        );
        assert_eq!(
            oem.license_service(),
            Some("/redfish/v1/Managers/1/LicenseService/")
        );

        let license = oem.license.unwrap().to_license("HP iLO license").unwrap();
        assert_eq!(license.key, "XXXXX-XXXXX-XXXXX-XXXXX-ABCDE");
        assert_eq!(license.license_type, "Perpetual");
        assert_eq!(license.expiration, "");
    }
}
