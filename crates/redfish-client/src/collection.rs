//! Collection listing, entity fetching and keyed lookups
//!
//! Every "map by X" accessor funnels through [`map_by_key`], so the rules for
//! missing keys and skipped members are the same for all entity types.

use std::collections::BTreeMap;

use redfish_core::{
    link_target, Account, AccountService, Capability, Chassis, Collection, Manager, Resource,
    Role, System,
};
use tracing::{debug, instrument};

use crate::client::RedfishClient;
use crate::error::{RedfishClientError, Result};

/// Index entities by a key field.
///
/// Members rejected by `keep` are skipped silently. A kept member without
/// the key is an integrity error naming the member's location.
pub fn map_by_key<T, K, F>(
    entities: Vec<T>,
    key_name: &str,
    key: K,
    keep: F,
) -> Result<BTreeMap<String, T>>
where
    T: Resource,
    K: Fn(&T) -> Option<&str>,
    F: Fn(&T) -> bool,
{
    let mut map = BTreeMap::new();
    for entity in entities {
        if !keep(&entity) {
            continue;
        }
        let value = key(&entity)
            .ok_or_else(|| {
                RedfishClientError::integrity(format!(
                    "entity at {} does not define {}",
                    entity.self_endpoint().unwrap_or("<unknown>"),
                    key_name
                ))
            })?
            .to_string();
        map.insert(value, entity);
    }
    Ok(map)
}

fn keep_all<T>(_: &T) -> bool {
    true
}

impl RedfishClient {
    // =========================================================================
    // Generic access
    // =========================================================================

    /// Member locations of a collection, in server order
    #[instrument(skip(self))]
    pub async fn list_members(&self, collection: &str) -> Result<Vec<String>> {
        self.require_session()?;
        let decoded: Collection = self.get_json(collection).await?;
        Ok(decoded.member_ids(collection)?)
    }

    /// Fetch one entity, stamped with the location it was fetched from
    #[instrument(skip(self))]
    pub async fn fetch_entity<T: Resource>(&self, endpoint: &str) -> Result<T> {
        self.require_session()?;
        let mut entity: T = self.get_json(endpoint).await?;
        entity.set_self_endpoint(endpoint.to_string());
        Ok(entity)
    }

    /// Fetch every member of a collection, one after another
    pub async fn fetch_members<T: Resource>(&self, collection: &str) -> Result<Vec<T>> {
        let members = self.list_members(collection).await?;
        debug!(count = members.len(), "Fetching members of {}", collection);

        let mut entities = Vec::with_capacity(members.len());
        for member in &members {
            entities.push(self.fetch_entity(member).await?);
        }
        Ok(entities)
    }

    // =========================================================================
    // Systems
    // =========================================================================

    pub async fn list_systems(&self) -> Result<Vec<System>> {
        let url = self.required_endpoints()?.systems.clone();
        self.fetch_members(&url).await
    }

    pub async fn get_system(&self, endpoint: &str) -> Result<System> {
        self.fetch_entity(endpoint).await
    }

    pub async fn map_systems_by_id(&self) -> Result<BTreeMap<String, System>> {
        map_by_key(self.list_systems().await?, "Id", |s| s.id.as_deref(), keep_all)
    }

    pub async fn map_systems_by_uuid(&self) -> Result<BTreeMap<String, System>> {
        map_by_key(self.list_systems().await?, "UUID", |s| s.uuid.as_deref(), keep_all)
    }

    pub async fn map_systems_by_serial_number(&self) -> Result<BTreeMap<String, System>> {
        map_by_key(
            self.list_systems().await?,
            "SerialNumber",
            |s| s.serial_number.as_deref(),
            keep_all,
        )
    }

    // =========================================================================
    // Chassis
    // =========================================================================

    pub async fn list_chassis(&mut self) -> Result<Vec<Chassis>> {
        self.require_session()?;
        self.require_capability(Capability::Chassis, "Chassis access")
            .await?;
        let url = self.required_endpoints()?.chassis.clone();
        self.fetch_members(&url).await
    }

    pub async fn get_chassis(&mut self, endpoint: &str) -> Result<Chassis> {
        self.require_session()?;
        self.require_capability(Capability::Chassis, "Chassis access")
            .await?;
        self.fetch_entity(endpoint).await
    }

    pub async fn map_chassis_by_id(&mut self) -> Result<BTreeMap<String, Chassis>> {
        map_by_key(self.list_chassis().await?, "Id", |c| c.id.as_deref(), keep_all)
    }

    pub async fn map_chassis_by_serial_number(&mut self) -> Result<BTreeMap<String, Chassis>> {
        map_by_key(
            self.list_chassis().await?,
            "SerialNumber",
            |c| c.serial_number.as_deref(),
            keep_all,
        )
    }

    // =========================================================================
    // Managers
    // =========================================================================

    pub async fn list_managers(&self) -> Result<Vec<Manager>> {
        let url = self.required_endpoints()?.managers.clone();
        self.fetch_members(&url).await
    }

    pub async fn get_manager(&self, endpoint: &str) -> Result<Manager> {
        self.fetch_entity(endpoint).await
    }

    pub async fn map_managers_by_id(&self) -> Result<BTreeMap<String, Manager>> {
        map_by_key(self.list_managers().await?, "Id", |m| m.id.as_deref(), keep_all)
    }

    pub async fn map_managers_by_uuid(&self) -> Result<BTreeMap<String, Manager>> {
        map_by_key(self.list_managers().await?, "UUID", |m| m.uuid.as_deref(), keep_all)
    }

    /// First member of the manager collection
    pub(crate) async fn first_manager(&self) -> Result<Manager> {
        let url = self.required_endpoints()?.managers.clone();
        let members = self.list_members(&url).await?;
        match members.first() {
            Some(first) => self.fetch_entity(first).await,
            None => Err(RedfishClientError::integrity(format!(
                "collection {} has no Members",
                url
            ))),
        }
    }

    // =========================================================================
    // Accounts and roles
    // =========================================================================

    pub async fn get_account_service(&mut self) -> Result<AccountService> {
        self.require_session()?;
        self.require_capability(Capability::AccountService, "Account management")
            .await?;

        let url = self
            .required_endpoints()?
            .account_service
            .clone()
            .ok_or_else(|| {
                RedfishClientError::integrity("service root does not define AccountService")
            })?;
        self.get_json(&url).await
    }

    /// Location of the account collection
    pub(crate) async fn accounts_endpoint(&mut self) -> Result<String> {
        let service = self.get_account_service().await?;
        link_target(&service.accounts)
            .map(str::to_string)
            .ok_or_else(|| RedfishClientError::integrity("AccountService does not define Accounts"))
    }

    pub async fn list_accounts(&mut self) -> Result<Vec<Account>> {
        let url = self.accounts_endpoint().await?;
        self.fetch_members(&url).await
    }

    pub async fn get_account(&mut self, endpoint: &str) -> Result<Account> {
        self.require_session()?;
        self.require_capability(Capability::AccountService, "Account management")
            .await?;
        self.fetch_entity(endpoint).await
    }

    /// Accounts by user name. Unused slots are left out.
    pub async fn map_accounts_by_name(&mut self) -> Result<BTreeMap<String, Account>> {
        map_by_key(
            self.list_accounts().await?,
            "UserName",
            |a| a.user_name.as_deref(),
            |a| !a.is_empty_slot(),
        )
    }

    pub async fn map_accounts_by_id(&mut self) -> Result<BTreeMap<String, Account>> {
        map_by_key(self.list_accounts().await?, "Id", |a| a.id.as_deref(), keep_all)
    }

    /// Roles of the account service; empty when no role collection exists.
    ///
    /// Flavors with a private privilege model have no roles to list.
    pub async fn list_roles(&mut self) -> Result<Vec<Role>> {
        self.require_session()?;
        self.require_capability(Capability::AccountRoles, "Role listing")
            .await?;
        let service = self.get_account_service().await?;
        match link_target(&service.roles) {
            Some(url) => self.fetch_members(url).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_role(&mut self, endpoint: &str) -> Result<Role> {
        self.require_session()?;
        self.require_capability(Capability::AccountRoles, "Role listing")
            .await?;
        self.fetch_entity(endpoint).await
    }

    pub async fn map_roles_by_name(&mut self) -> Result<BTreeMap<String, Role>> {
        map_by_key(self.list_roles().await?, "Name", |r| r.name.as_deref(), keep_all)
    }

    pub async fn map_roles_by_id(&mut self) -> Result<BTreeMap<String, Role>> {
        map_by_key(self.list_roles().await?, "Id", |r| r.id.as_deref(), keep_all)
    }
}
