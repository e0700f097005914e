//! Redfish Client Library
//!
//! Session-authenticated client for Redfish service processors (BMCs) with
//! vendor-specific adapters for the parts of the protocol every vendor does
//! differently.
//!
//! # Example
//!
//! ```rust,no_run
//! use redfish_client::{ClientConfig, RedfishClient};
//!
//! #[tokio::main]
//! async fn main() -> redfish_client::Result<()> {
//!     let config = ClientConfig::builder("bmc01.example.net")
//!         .credentials("admin", "secret")
//!         .insecure_tls(true)
//!         .build();
//!     let mut client = RedfishClient::new(config)?;
//!
//!     // Discover the service root and open a session
//!     client.connect().await?;
//!
//!     // Which vendor dialect does this BMC speak?
//!     let flavor = client.resolve_flavor().await?;
//!     println!("{} speaks {}", client.base_url(), flavor);
//!
//!     for (id, system) in client.map_systems_by_id().await? {
//!         println!("{}: {:?}", id, system.power_state);
//!     }
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Vendor Operations
//!
//! Account management, CSR generation, certificate import and licensing
//! are routed through a [`VendorAdapter`] chosen by the resolved flavor.
//! Operations a flavor does not support fail with
//! [`RedfishClientError::Unsupported`] before any request is sent.
//!
//! ```rust,ignore
//! use redfish_client::redfish_core::AccountRequest;
//!
//! client
//!     .create_account(&AccountRequest::new("ops", "s3cret").with_role("Operator"))
//!     .await?;
//! ```
//!
//! # Testing
//!
//! The `testing` module provides an in-process mock BMC:
//!
//! ```rust,ignore
//! use redfish_client::testing::MockBmc;
//!
//! let bmc = MockBmc::start("Contoso").await?;
//! let mut client = RedfishClient::new(bmc.config())?;
//! client.connect().await?;
//! ```

pub mod accounts;
pub mod certificates;
pub mod client;
pub mod collection;
pub mod config;
pub mod discovery;
pub mod error;
pub mod flavor;
pub mod license;
pub mod power;
pub mod session;
pub mod testing;
pub mod transport;
pub mod vendor;

pub use client::RedfishClient;
pub use collection::map_by_key;
pub use config::{ClientConfig, ConfigError};
pub use error::{ErrorKind, RedfishClientError, Result};
pub use vendor::{adapter_for, VendorAdapter};

// Re-export the data model for convenience
pub use redfish_core;
pub use redfish_core::{Capability, Flavor};
