//! Vendor flavors and their capability sets

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// Which vendor dialect of Redfish a target speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Not resolved yet
    #[default]
    Uninitialized,
    /// Unknown vendor, standard semantics assumed
    Generic,
    Hp,
    Hpe,
    Huawei,
    Inspur,
    Lenovo,
    Supermicro,
    Dell,
}

/// Optional sub-services a flavor may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    AccountService,
    SecurityService,
    /// Role based access control (as opposed to a private privilege map)
    AccountRoles,
    Chassis,
    License,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountService => "account service",
            Self::SecurityService => "security service",
            Self::AccountRoles => "account roles",
            Self::Chassis => "chassis inventory",
            Self::License => "licensing",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set of a flavor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Exposes an AccountService
    pub account_service: bool,
    /// Exposes an HTTPS certificate / security service
    pub security_service: bool,
    /// Uses the standard role collection
    pub account_roles: bool,
    /// Exposes chassis inventory
    pub chassis: bool,
    /// Supports license management
    pub license: bool,
}

impl Capabilities {
    /// Nothing optional is available
    pub fn none() -> Self {
        Self::default()
    }

    /// What a standard compliant service processor offers
    pub fn standard() -> Self {
        Self {
            account_service: true,
            security_service: true,
            account_roles: true,
            chassis: true,
            license: false,
        }
    }

    /// iLO: private privilege map instead of roles, licensing via OEM links
    pub fn ilo() -> Self {
        Self {
            account_service: true,
            security_service: true,
            account_roles: false,
            chassis: true,
            license: true,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::AccountService => self.account_service,
            Capability::SecurityService => self.security_service,
            Capability::AccountRoles => self.account_roles,
            Capability::Chassis => self.chassis,
            Capability::License => self.license,
        }
    }
}

/// Manufacturer strings (lower-cased, trimmed) with a fixed flavor
const MANUFACTURERS: &[(&str, Flavor)] = &[
    ("huawei", Flavor::Huawei),
    ("inspur", Flavor::Inspur),
    ("lenovo", Flavor::Lenovo),
    ("supermicro", Flavor::Supermicro),
    ("dell", Flavor::Dell),
    ("dell inc.", Flavor::Dell),
];

impl Flavor {
    /// Every flavor, including the unresolved one
    pub const ALL: [Flavor; 9] = [
        Flavor::Uninitialized,
        Flavor::Generic,
        Flavor::Hp,
        Flavor::Hpe,
        Flavor::Huawei,
        Flavor::Inspur,
        Flavor::Lenovo,
        Flavor::Supermicro,
        Flavor::Dell,
    ];

    /// Display string of the flavor
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Generic => "vanilla",
            Self::Hp => "hp",
            Self::Hpe => "hpe",
            Self::Huawei => "huawei",
            Self::Inspur => "inspur",
            Self::Lenovo => "lenovo",
            Self::Supermicro => "supermicro",
            Self::Dell => "dell",
        }
    }

    pub fn is_resolved(&self) -> bool {
        *self != Self::Uninitialized
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Uninitialized => Capabilities::none(),
            Self::Generic => Capabilities::standard(),
            Self::Hp | Self::Hpe => Capabilities::ilo(),
            Self::Huawei => Capabilities::standard(),
            Self::Inspur => Capabilities::none(),
            Self::Lenovo => Capabilities {
                chassis: true,
                ..Capabilities::none()
            },
            Self::Supermicro | Self::Dell => Capabilities {
                security_service: false,
                ..Capabilities::standard()
            },
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().has(capability)
    }

    /// Key of this flavor's block inside an `Oem` object, if it has one
    pub fn oem_key(&self) -> Option<&'static str> {
        match self {
            Self::Hp => Some("Hp"),
            Self::Hpe => Some("Hpe"),
            Self::Huawei => Some("Huawei"),
            Self::Supermicro => Some("Supermicro"),
            Self::Dell => Some("Dell"),
            Self::Lenovo => Some("Lenovo"),
            Self::Inspur => Some("Inspur"),
            Self::Generic | Self::Uninitialized => None,
        }
    }

    /// Map a system's `Manufacturer` to a flavor.
    ///
    /// HP and HPE firmware report either manufacturer string regardless of
    /// generation, so the flavor is taken from whichever of the `Hp` / `Hpe`
    /// keys the system's `Oem` block carries. Exactly one must be present.
    /// Unknown manufacturers resolve to [`Flavor::Generic`].
    pub fn from_manufacturer(manufacturer: &str, oem: Option<&Value>) -> ModelResult<Flavor> {
        let normalized = manufacturer.trim().to_lowercase();

        if normalized == "hp" || normalized == "hpe" {
            let has_key = |key: &str| oem.and_then(|o| o.get(key)).is_some();
            return match (has_key("Hp"), has_key("Hpe")) {
                (true, false) => Ok(Flavor::Hp),
                (false, true) => Ok(Flavor::Hpe),
                (true, true) => Err(ModelError::Integrity(format!(
                    "system of manufacturer {} carries both Oem.Hp and Oem.Hpe",
                    manufacturer
                ))),
                (false, false) => Err(ModelError::Integrity(format!(
                    "system of manufacturer {} carries neither Oem.Hp nor Oem.Hpe",
                    manufacturer
                ))),
            };
        }

        Ok(MANUFACTURERS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, flavor)| *flavor)
            .unwrap_or(Flavor::Generic))
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
