//! In-memory store
//!
//! Suitable for single-process hosts and testing. Upserts are idempotent
//! by natural key, matching how the persistence layer applies role and
//! assignment definitions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rbac_core::{GrantId, PermissionGrant, Role, RoleAssignment, User};
use tokio::sync::RwLock;

use crate::store::{RbacStore, StoreResult};

/// Natural key of a role assignment: user, role and source.
type AssignmentKey = (String, String, String);

/// In-memory [`RbacStore`] implementation.
#[derive(Clone, Default)]
pub struct MemoryRbacStore {
    /// Users by name
    users: Arc<RwLock<HashMap<String, User>>>,
    /// Roles by name
    roles: Arc<RwLock<HashMap<String, Role>>>,
    /// Role assignments by natural key
    assignments: Arc<RwLock<HashMap<AssignmentKey, RoleAssignment>>>,
    /// Grants by id
    grants: Arc<RwLock<HashMap<GrantId, PermissionGrant>>>,
}

impl std::fmt::Debug for MemoryRbacStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRbacStore").finish_non_exhaustive()
    }
}

impl MemoryRbacStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub async fn add_or_update_user(&self, user: User) -> User {
        self.users.write().await.insert(user.name.clone(), user.clone());
        user
    }

    /// Insert or replace a role.
    pub async fn add_or_update_role(&self, role: Role) -> Role {
        self.roles.write().await.insert(role.name.clone(), role.clone());
        role
    }

    /// Insert or replace a role assignment, keyed by user, role and source.
    pub async fn add_or_update_role_assignment(&self, assignment: RoleAssignment) -> RoleAssignment {
        let key = (
            assignment.user.clone(),
            assignment.role.clone(),
            assignment.source.clone(),
        );
        self.assignments.write().await.insert(key, assignment.clone());
        assignment
    }

    /// Insert or replace a grant.
    pub async fn add_or_update_permission_grant(&self, grant: PermissionGrant) -> PermissionGrant {
        self.grants.write().await.insert(grant.id(), grant.clone());
        grant
    }

    /// Remove every assignment loaded from `source`.
    ///
    /// Returns the number of assignments removed.
    pub async fn remove_role_assignments_from_source(&self, source: &str) -> usize {
        let mut assignments = self.assignments.write().await;
        let before = assignments.len();
        assignments.retain(|(_, _, s), _| s != source);
        before - assignments.len()
    }
}

#[async_trait]
impl RbacStore for MemoryRbacStore {
    async fn find_user(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(name).cloned())
    }

    async fn find_role_assignments_for_user(
        &self,
        user: &str,
        active_only: bool,
    ) -> StoreResult<Vec<RoleAssignment>> {
        let assignments = self.assignments.read().await;
        let mut found: Vec<RoleAssignment> = assignments
            .values()
            .filter(|a| a.user == user && (!active_only || a.is_active))
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.role, &a.source).cmp(&(&b.role, &b.source)));
        Ok(found)
    }

    async fn find_role(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(self.roles.read().await.get(name).cloned())
    }

    async fn find_permission_grants_by_ids(&self, ids: &[GrantId]) -> StoreResult<Vec<PermissionGrant>> {
        let grants = self.grants.read().await;
        Ok(ids.iter().filter_map(|id| grants.get(id).cloned()).collect())
    }
}
