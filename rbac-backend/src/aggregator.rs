//! Role aggregation
//!
//! Resolves the roles a user holds and the grants those roles carry.
//! Assignments are strictly additive: every effective assignment
//! contributes its role, with no precedence between sources.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use rbac_core::{GrantId, PermissionGrant, RbacResult, ResourceType, Role, SystemRole, User};
use tracing::{debug, warn};

use crate::config::RbacConfig;
use crate::store::RbacStore;

/// Resolves roles and grants for a user.
#[derive(Clone)]
pub struct RoleAggregator {
    store: Arc<dyn RbacStore>,
    include_remote_assignments: bool,
}

impl std::fmt::Debug for RoleAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAggregator")
            .field("include_remote_assignments", &self.include_remote_assignments)
            .finish()
    }
}

impl RoleAggregator {
    /// Create an aggregator reading from `store`.
    pub fn new(store: Arc<dyn RbacStore>, config: &RbacConfig) -> Self {
        Self {
            store,
            include_remote_assignments: config.include_remote_assignments,
        }
    }

    /// Names of every role the user holds through an effective assignment,
    /// system roles included.
    pub async fn role_names_for_user(&self, user: &User) -> RbacResult<BTreeSet<String>> {
        let now = Utc::now();
        let assignments = self.store.find_role_assignments_for_user(&user.name, true).await?;

        let names: BTreeSet<String> = assignments
            .into_iter()
            .filter(|a| a.is_effective_at(now))
            .filter(|a| self.include_remote_assignments || !a.is_remote)
            .map(|a| a.role)
            .collect();

        debug!(user = %user.name, roles = ?names, "Resolved role names");
        Ok(names)
    }

    /// Persisted roles the user holds.
    ///
    /// System roles have no record and are left out, as are assigned roles
    /// that no longer exist.
    pub async fn roles_for_user(&self, user: &User) -> RbacResult<Vec<Role>> {
        let names = self.role_names_for_user(user).await?;
        self.roles_named(&names).await
    }

    /// Union of the grants carried by the user's roles, restricted to
    /// `resource_type`.
    pub async fn grants_for_user(&self, user: &User, resource_type: ResourceType) -> RbacResult<Vec<PermissionGrant>> {
        let roles = self.roles_for_user(user).await?;
        self.grants_for_roles(&roles, resource_type).await
    }

    /// Resolve role names to role records.
    pub(crate) async fn roles_named(&self, names: &BTreeSet<String>) -> RbacResult<Vec<Role>> {
        let mut roles = Vec::with_capacity(names.len());
        for name in names.iter().filter(|name| !SystemRole::is_system_role(name)) {
            match self.store.find_role(name).await? {
                Some(role) => roles.push(role),
                None => warn!(role = %name, "Assigned role does not exist"),
            }
        }
        Ok(roles)
    }

    /// Union of the grants carried by `roles`, restricted to `resource_type`.
    pub(crate) async fn grants_for_roles(
        &self,
        roles: &[Role],
        resource_type: ResourceType,
    ) -> RbacResult<Vec<PermissionGrant>> {
        let ids: BTreeSet<GrantId> = roles
            .iter()
            .flat_map(|role| role.permission_grants.iter().copied())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<GrantId> = ids.into_iter().collect();
        let found = self.store.find_permission_grants_by_ids(&ids).await?;
        if found.len() < ids.len() {
            warn!(
                requested = ids.len(),
                found = found.len(),
                "Some referenced permission grants do not exist"
            );
        }

        let grants: BTreeMap<GrantId, PermissionGrant> = found
            .into_iter()
            .filter(|grant| grant.resource_type() == resource_type)
            .map(|grant| (grant.id(), grant))
            .collect();
        Ok(grants.into_values().collect())
    }
}
