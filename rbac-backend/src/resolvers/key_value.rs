//! Key-value pair permission resolver.

use async_trait::async_trait;
use rbac_core::{PermissionType, RbacResult, ResourceIdentity, ResourceType, User};

use super::{PermissionsResolver, ResolverBase, ResourceScope};
use crate::aggregator::RoleAggregator;

/// Resolves permissions on datastore key-value pairs.
///
/// Every key is its own resource: a grant on one uid says nothing about
/// other keys in the same scope.
#[derive(Debug, Clone)]
pub struct KeyValuePermissionsResolver {
    base: ResolverBase,
}

impl KeyValuePermissionsResolver {
    /// Create a resolver reading roles and grants through `aggregator`.
    pub fn new(aggregator: RoleAggregator) -> Self {
        Self {
            base: ResolverBase::new(ResourceType::KeyValuePair, aggregator),
        }
    }
}

#[async_trait]
impl PermissionsResolver for KeyValuePermissionsResolver {
    fn resource_type(&self) -> ResourceType {
        self.base.resource_type()
    }

    async fn user_has_permission(&self, user: &User, permission_type: PermissionType) -> RbacResult<bool> {
        self.base.has_permission(user, permission_type).await
    }

    async fn user_has_resource_db_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool> {
        self.base
            .has_resource_permission(user, resource, permission_type)
            .await
    }

    async fn user_has_resource_api_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool> {
        // API objects carry scope, owner and name, which is all the uid needs
        self.base
            .has_resource_permission(user, resource, permission_type)
            .await
    }

    async fn permitted_resources(&self, user: &User, permission_type: PermissionType) -> RbacResult<ResourceScope> {
        self.base.permitted_resources(user, permission_type).await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::config::RbacConfig;
    use crate::memory::MemoryRbacStore;
    use rbac_core::{KeyValuePair, KeyValuePairApi, PermissionGrant, RbacError, Role, RoleAssignment};
    use std::sync::Arc;

    async fn resolver_with_view_grant() -> (KeyValuePermissionsResolver, User, KeyValuePair) {
        let store = MemoryRbacStore::new();
        let kvp = KeyValuePair::user("testu", "key1", "val1");
        let grant = PermissionGrant::new(kvp.uid(), ResourceType::KeyValuePair, [PermissionType::KeyValuePairView])
            .unwrap();
        let grant = store.add_or_update_permission_grant(grant).await;
        store.add_or_update_role(Role::new("kv_view").with_grants([grant.id()])).await;
        let user = store.add_or_update_user(User::new("viewer")).await;
        store
            .add_or_update_role_assignment(RoleAssignment::new("viewer", "kv_view", "assignments/viewer.yaml"))
            .await;

        let aggregator = RoleAggregator::new(Arc::new(store), &RbacConfig::default());
        (KeyValuePermissionsResolver::new(aggregator), user, kvp)
    }

    #[tokio::test]
    async fn test_api_permission_uses_same_uid() {
        let (resolver, user, _) = resolver_with_view_grant().await;
        let api = KeyValuePairApi {
            scope: "st2kv.user".to_string(),
            name: "key1".to_string(),
            user: Some("testu".to_string()),
        };
        assert!(resolver
            .user_has_resource_api_permission(&user, &api, PermissionType::KeyValuePairView)
            .await
            .unwrap());
        assert!(!resolver
            .user_has_resource_api_permission(&user, &api, PermissionType::KeyValuePairSet)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_foreign_permission_type_fails_fast() {
        let (resolver, user, kvp) = resolver_with_view_grant().await;
        let err = resolver
            .user_has_resource_db_permission(&user, &kvp, PermissionType::ActionExecute)
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::InvalidPermissionType { .. }));

        let err = resolver
            .user_has_permission(&user, PermissionType::RuleList)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PERMISSION_TYPE");
    }

    #[tokio::test]
    async fn test_type_level_permission() {
        let (resolver, user, _) = resolver_with_view_grant().await;
        assert!(resolver
            .user_has_permission(&user, PermissionType::KeyValuePairView)
            .await
            .unwrap());
        assert!(!resolver
            .user_has_permission(&user, PermissionType::KeyValuePairList)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_permitted_resources() {
        let (resolver, user, kvp) = resolver_with_view_grant().await;
        let scope = resolver
            .permitted_resources(&user, PermissionType::KeyValuePairView)
            .await
            .unwrap();
        assert_eq!(scope, ResourceScope::Only([kvp.uid()].into()));

        let scope = resolver
            .permitted_resources(&user, PermissionType::KeyValuePairDelete)
            .await
            .unwrap();
        assert_eq!(scope, ResourceScope::Only(Default::default()));
    }
}
