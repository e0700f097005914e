//! redfish-core - Data model for the Redfish BMC protocol
//!
//! This crate holds everything about the protocol that does not need a
//! network connection: resource shapes, the standard error envelope, vendor
//! flavors with their capability sets, and the vendor extension (`Oem`)
//! payloads that only a matching vendor adapter interprets.

pub mod error;
pub mod flavor;
pub mod models;
pub mod oem;

pub use error::{ErrorBody, ErrorEnvelope, ExtendedInfo, ModelError, ModelResult};
pub use flavor::{Capabilities, Capability, Flavor};
pub use models::*;
