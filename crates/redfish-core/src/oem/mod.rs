//! Vendor extension (`Oem`) payloads
//!
//! These shapes are only meaningful for the flavor that owns them and are
//! decoded lazily from the raw `Oem` blocks kept on each resource.

pub mod hp;
pub mod huawei;
pub mod supermicro;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

/// Decode `Oem.<key>` of a resource.
///
/// `owner` names the resource in error messages.
pub fn vendor_block<T: DeserializeOwned>(
    oem: Option<&Value>,
    key: &str,
    owner: &str,
) -> ModelResult<T> {
    let block = oem
        .and_then(|oem| oem.get(key))
        .ok_or_else(|| ModelError::Integrity(format!("{} has no Oem.{} block", owner, key)))?;

    serde_json::from_value(block.clone())
        .map_err(|e| ModelError::Integrity(format!("malformed {} Oem.{}: {}", owner, key, e)))
}
