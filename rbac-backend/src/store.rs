//! Persistence read contract
//!
//! The resolvers only read users, role assignments, roles and grants.
//! Writes, retries and caching all belong to the implementation of
//! [`RbacStore`].

use async_trait::async_trait;
use rbac_core::{GrantId, PermissionGrant, RbacError, Role, RoleAssignment, User};
use thiserror::Error;

/// Persistence error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Read did not complete in time
    #[error("Read timed out: {0}")]
    Timeout(String),

    /// Stored record failed validation
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Internal storage failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for persistence reads.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for RbacError {
    fn from(err: StoreError) -> Self {
        RbacError::ResolutionUnavailable(err.to_string())
    }
}

/// Read access to RBAC records.
///
/// Every method is a single read; implementations may serve each call from
/// a different snapshot.
#[async_trait]
pub trait RbacStore: Send + Sync {
    /// Find a user by name.
    async fn find_user(&self, name: &str) -> StoreResult<Option<User>>;

    /// Find the role assignments of a user.
    ///
    /// With `active_only`, inactive assignments are left out.
    async fn find_role_assignments_for_user(
        &self,
        user: &str,
        active_only: bool,
    ) -> StoreResult<Vec<RoleAssignment>>;

    /// Find a role by name.
    async fn find_role(&self, name: &str) -> StoreResult<Option<Role>>;

    /// Find the grants with the given ids. Unknown ids are skipped.
    async fn find_permission_grants_by_ids(&self, ids: &[GrantId]) -> StoreResult<Vec<PermissionGrant>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_becomes_resolution_unavailable() {
        let err: RbacError = StoreError::Timeout("find_role".to_string()).into();
        assert_eq!(
            err,
            RbacError::ResolutionUnavailable("Read timed out: find_role".to_string())
        );
        assert!(err.is_server_error());
    }
}
