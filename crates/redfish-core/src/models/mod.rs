//! Redfish resource models

mod account;
mod certificate;
mod chassis;
mod manager;
mod odata;
mod system;

pub use account::*;
pub use certificate::*;
pub use chassis::*;
pub use manager::*;
pub use odata::*;
pub use system::*;

use serde::de::DeserializeOwned;

/// A resource fetched from its own location.
///
/// The location is stamped by the client after decoding; it is never taken
/// from the body.
pub trait Resource: DeserializeOwned {
    fn self_endpoint(&self) -> Option<&str>;
    fn set_self_endpoint(&mut self, endpoint: String);
}

macro_rules! impl_resource {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Resource for $ty {
                fn self_endpoint(&self) -> Option<&str> {
                    self.self_endpoint.as_deref()
                }

                fn set_self_endpoint(&mut self, endpoint: String) {
                    self.self_endpoint = Some(endpoint);
                }
            }
        )+
    };
}

impl_resource!(System, Chassis, Manager, Account, Role);
