//! Account management
//!
//! The capability gate runs before anything vendor specific, so a flavor
//! without an account service is rejected without a single request once its
//! flavor is known.

use redfish_core::oem::hp::VirtualRole;
use redfish_core::{AccountRequest, Capability};
use tracing::{info, instrument};

use crate::client::RedfishClient;
use crate::error::{RedfishClientError, Result};
use crate::vendor::adapter_for;

const OPERATION: &str = "Account management";

/// Reject a malformed virtual role before anything goes on the wire
fn check_virtual_role(request: &AccountRequest) -> Result<()> {
    if let Some(role) = &request.virtual_role {
        role.parse::<VirtualRole>()?;
    }
    Ok(())
}

impl RedfishClient {
    /// Create an account.
    ///
    /// Standard vendors need user name, password and an existing role.
    /// iLO takes a virtual role and/or privilege bits instead of a role.
    #[instrument(skip(self, request), fields(user = ?request.user_name))]
    pub async fn create_account(&mut self, request: &AccountRequest) -> Result<()> {
        self.require_session()?;
        check_virtual_role(request)?;
        let flavor = self
            .require_capability(Capability::AccountService, OPERATION)
            .await?;

        adapter_for(flavor).create_account(self, request).await
    }

    /// Change the fields set in `request` on the account of `username`
    #[instrument(skip(self, request))]
    pub async fn modify_account(&mut self, username: &str, request: &AccountRequest) -> Result<()> {
        self.require_session()?;
        check_virtual_role(request)?;
        let flavor = self
            .require_capability(Capability::AccountService, OPERATION)
            .await?;

        adapter_for(flavor)
            .modify_account(self, username, request)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&mut self, username: &str) -> Result<()> {
        self.require_session()?;
        let flavor = self
            .require_capability(Capability::AccountService, OPERATION)
            .await?;

        adapter_for(flavor).delete_account(self, username).await
    }

    /// Set a new password for `username`.
    ///
    /// Goes through the vendor's modify path, so slot restrictions apply.
    #[instrument(skip(self, password))]
    pub async fn change_password(&mut self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() {
            return Err(RedfishClientError::InvalidRequest("username is empty".into()));
        }
        if password.is_empty() {
            return Err(RedfishClientError::InvalidRequest(format!(
                "password for {} is empty",
                username
            )));
        }
        self.require_session()?;
        let flavor = self
            .require_capability(Capability::AccountService, OPERATION)
            .await?;

        let request = password_change(password);
        adapter_for(flavor)
            .modify_account(self, username, &request)
            .await?;

        info!(user = username, "Password changed");
        Ok(())
    }
}

/// Modification request that only sets the password
fn password_change(password: &str) -> AccountRequest {
    AccountRequest {
        password: Some(password.to_string()),
        ..AccountRequest::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_role_checked_up_front() {
        let request = AccountRequest::new("ops", "pw").with_virtual_role("Administrator");
        assert!(check_virtual_role(&request).is_ok());

        let request = AccountRequest::new("ops", "pw").with_virtual_role("root");
        assert!(matches!(
            check_virtual_role(&request),
            Err(RedfishClientError::InvalidRequest(_))
        ));

        assert!(check_virtual_role(&AccountRequest::new("ops", "pw")).is_ok());
    }

    #[test]
    fn test_password_change_sets_nothing_else() {
        let request = password_change("s3cret");
        assert_eq!(request.password.as_deref(), Some("s3cret"));
        assert_eq!(
            request,
            AccountRequest {
                password: Some("s3cret".into()),
                ..AccountRequest::default()
            }
        );
        assert!(request.user_name.is_none() && request.role.is_none());
    }
}
