//! HTTPS certificate resources and CSR subjects

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::odata::{LinkTarget, ODataLink};
use crate::error::{ModelError, ModelResult};

/// Security service reached through a manager's vendor block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityService {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub links: SecurityServiceLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityServiceLinks {
    #[serde(rename = "HttpsCert", default)]
    pub https_cert: Option<ODataLink>,
}

/// HTTPS certificate resource of the service processor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpsCert {
    #[serde(default)]
    pub id: Option<String>,
    /// Pending CSR; absent both before generation and while it runs
    #[serde(default)]
    pub certificate_signing_request: Option<String>,
    /// Currently installed certificate
    #[serde(rename = "X509CertificateInformation", default)]
    pub certificate_info: Option<X509CertificateInfo>,
    /// Action names differ per vendor, so actions stay raw
    #[serde(default)]
    pub actions: Option<Value>,
}

impl HttpsCert {
    /// Target of the named action, e.g. `#HpHttpsCert.GenerateCSR`.
    pub fn action_target(&self, action: &str) -> ModelResult<String> {
        let declared = self
            .actions
            .as_ref()
            .and_then(|actions| actions.get(action))
            .ok_or_else(|| {
                ModelError::Integrity(format!("HttpsCert does not declare Actions.{}", action))
            })?;

        let link: LinkTarget = serde_json::from_value(declared.clone()).map_err(|e| {
            ModelError::Integrity(format!("malformed HttpsCert Actions.{}: {}", action, e))
        })?;

        link.target().map(str::to_string).ok_or_else(|| {
            ModelError::Integrity(format!(
                "HttpsCert Actions.{} does not define a target",
                action
            ))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct X509CertificateInfo {
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub valid_not_after: Option<String>,
    #[serde(default)]
    pub valid_not_before: Option<String>,
}

/// Subject of a certificate signing request. Empty fields are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrSubject {
    pub country: String,
    pub state: String,
    pub locality: String,
    pub organization: String,
    pub organizational_unit: String,
    pub common_name: String,
}

impl CsrSubject {
    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("C", self.country.as_str()),
            ("S", self.state.as_str()),
            ("L", self.locality.as_str()),
            ("O", self.organization.as_str()),
            ("OU", self.organizational_unit.as_str()),
            ("CN", self.common_name.as_str()),
        ]
    }

    /// Every subject field must be set
    pub fn require_complete(&self) -> ModelResult<()> {
        let missing: Vec<&str> = self
            .fields()
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::InvalidRequest(format!(
                "CSR subject requires C, S, L, O, OU and CN; missing {}",
                missing.join(", ")
            )))
        }
    }

    /// No subject field may contain `/`
    pub fn forbid_slash(&self) -> ModelResult<()> {
        match self.fields().iter().find(|(_, value)| value.contains('/')) {
            Some((name, _)) => Err(ModelError::InvalidRequest(format!(
                "CSR subject field {} must not contain '/'",
                name
            ))),
            None => Ok(()),
        }
    }
}

/// Wire shape of a CSR generation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsrRequest {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_unit: Option<String>,
    pub common_name: String,
}

/// Country used when none is given
pub const CSR_UNKNOWN_COUNTRY: &str = "XX";

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl CsrRequest {
    /// Unset fields are omitted; country and common name always have a value.
    pub fn standard(subject: &CsrSubject, hostname: &str) -> Self {
        Self {
            country: non_empty(&subject.country).unwrap_or_else(|| CSR_UNKNOWN_COUNTRY.into()),
            state: non_empty(&subject.state),
            city: non_empty(&subject.locality),
            org_name: non_empty(&subject.organization),
            org_unit: non_empty(&subject.organizational_unit),
            common_name: non_empty(&subject.common_name).unwrap_or_else(|| hostname.into()),
        }
    }
}

/// Payload for certificate import actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateImportRequest<'a> {
    pub certificate: &'a str,
}
