//! Permission resolvers
//!
//! One resolver per supported resource type, all sharing the
//! [`PermissionsResolver`] contract. [`Resolver`] is the closed set the
//! backend hands out.

use std::collections::BTreeSet;

use async_trait::async_trait;
use rbac_core::{
    Decision, PermissionType, RbacError, RbacResult, ResourceIdentity, ResourceType, SystemRolePolicy, User,
};
use tracing::debug;

use crate::aggregator::RoleAggregator;

pub mod key_value;

pub use key_value::KeyValuePermissionsResolver;

/// Resources of one type a user may act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceScope {
    /// Every resource of the type, through a system role.
    All,
    /// Only the resources with these uids.
    Only(BTreeSet<String>),
}

impl ResourceScope {
    /// Check if a uid is inside the scope.
    pub fn contains(&self, uid: &str) -> bool {
        match self {
            ResourceScope::All => true,
            ResourceScope::Only(uids) => uids.contains(uid),
        }
    }
}

/// Decision contract shared by every resolver.
///
/// Denial is `Ok(false)`. Errors are reserved for invalid input and
/// persistence outages.
#[async_trait]
pub trait PermissionsResolver: Send + Sync {
    /// Resource type this resolver answers for.
    fn resource_type(&self) -> ResourceType;

    /// Check a permission without a specific resource, e.g. for listing.
    ///
    /// True if a system role allows it, or the user holds at least one grant
    /// carrying the permission type on some resource of this type.
    async fn user_has_permission(&self, user: &User, permission_type: PermissionType) -> RbacResult<bool>;

    /// Check a permission on a stored resource.
    async fn user_has_resource_db_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool>;

    /// Check a permission on a resource submitted through the API that has
    /// not been stored yet.
    async fn user_has_resource_api_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool>;

    /// Resources of this type the user holds `permission_type` on.
    async fn permitted_resources(&self, user: &User, permission_type: PermissionType) -> RbacResult<ResourceScope>;
}

/// Resolver for each supported resource type.
#[derive(Debug, Clone)]
pub enum Resolver {
    /// Key-value pairs.
    KeyValuePair(KeyValuePermissionsResolver),
}

#[async_trait]
impl PermissionsResolver for Resolver {
    fn resource_type(&self) -> ResourceType {
        match self {
            Resolver::KeyValuePair(r) => r.resource_type(),
        }
    }

    async fn user_has_permission(&self, user: &User, permission_type: PermissionType) -> RbacResult<bool> {
        match self {
            Resolver::KeyValuePair(r) => r.user_has_permission(user, permission_type).await,
        }
    }

    async fn user_has_resource_db_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool> {
        match self {
            Resolver::KeyValuePair(r) => {
                r.user_has_resource_db_permission(user, resource, permission_type)
                    .await
            }
        }
    }

    async fn user_has_resource_api_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool> {
        match self {
            Resolver::KeyValuePair(r) => {
                r.user_has_resource_api_permission(user, resource, permission_type)
                    .await
            }
        }
    }

    async fn permitted_resources(&self, user: &User, permission_type: PermissionType) -> RbacResult<ResourceScope> {
        match self {
            Resolver::KeyValuePair(r) => r.permitted_resources(user, permission_type).await,
        }
    }
}

/// Decision steps common to every grant-based resolver.
#[derive(Debug, Clone)]
pub(crate) struct ResolverBase {
    resource_type: ResourceType,
    aggregator: RoleAggregator,
    policy: SystemRolePolicy,
}

impl ResolverBase {
    pub(crate) fn new(resource_type: ResourceType, aggregator: RoleAggregator) -> Self {
        Self {
            resource_type,
            aggregator,
            policy: SystemRolePolicy,
        }
    }

    pub(crate) fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    fn ensure_resource(&self, resource: &dyn ResourceIdentity) -> RbacResult<()> {
        if resource.resource_type() != self.resource_type {
            return Err(RbacError::InvalidResourceType(format!(
                "{} resolver cannot check {} resources",
                self.resource_type,
                resource.resource_type()
            )));
        }
        Ok(())
    }

    /// System role decision for the user, plus the role names it was based on.
    async fn system_decision(
        &self,
        user: &User,
        permission_type: PermissionType,
    ) -> RbacResult<(Decision, BTreeSet<String>)> {
        let names = self.aggregator.role_names_for_user(user).await?;
        let decision = self
            .policy
            .decide(names.iter().map(String::as_str), self.resource_type, permission_type);
        Ok((decision, names))
    }

    pub(crate) async fn has_permission(&self, user: &User, permission_type: PermissionType) -> RbacResult<bool> {
        permission_type.ensure_valid_for(self.resource_type)?;

        let (decision, names) = self.system_decision(user, permission_type).await?;
        let allowed = match decision {
            Decision::Allow => true,
            Decision::Deny => false,
            Decision::NoOpinion => {
                let roles = self.aggregator.roles_named(&names).await?;
                let grants = self.aggregator.grants_for_roles(&roles, self.resource_type).await?;
                grants.iter().any(|grant| grant.grants_permission_type(permission_type))
            }
        };

        debug!(
            user = %user.name,
            resource_type = %self.resource_type,
            permission_type = %permission_type,
            ?decision,
            allowed,
            "Resolved type permission"
        );
        Ok(allowed)
    }

    pub(crate) async fn has_resource_permission(
        &self,
        user: &User,
        resource: &dyn ResourceIdentity,
        permission_type: PermissionType,
    ) -> RbacResult<bool> {
        permission_type.ensure_valid_for(self.resource_type)?;
        self.ensure_resource(resource)?;

        let resource_uid = resource.uid();
        let (decision, names) = self.system_decision(user, permission_type).await?;
        let allowed = match decision {
            Decision::Allow => true,
            Decision::Deny => false,
            Decision::NoOpinion => {
                let roles = self.aggregator.roles_named(&names).await?;
                let grants = self.aggregator.grants_for_roles(&roles, self.resource_type).await?;
                grants.iter().any(|grant| grant.matches(&resource_uid, permission_type))
            }
        };

        debug!(
            user = %user.name,
            resource_uid = %resource_uid,
            permission_type = %permission_type,
            ?decision,
            allowed,
            "Resolved resource permission"
        );
        Ok(allowed)
    }

    pub(crate) async fn permitted_resources(
        &self,
        user: &User,
        permission_type: PermissionType,
    ) -> RbacResult<ResourceScope> {
        permission_type.ensure_valid_for(self.resource_type)?;

        let (decision, names) = self.system_decision(user, permission_type).await?;
        match decision {
            Decision::Allow => Ok(ResourceScope::All),
            Decision::Deny => Ok(ResourceScope::Only(BTreeSet::new())),
            Decision::NoOpinion => {
                let roles = self.aggregator.roles_named(&names).await?;
                let grants = self.aggregator.grants_for_roles(&roles, self.resource_type).await?;
                let uids = grants
                    .into_iter()
                    .filter(|grant| grant.grants_permission_type(permission_type))
                    .map(|grant| grant.resource_uid().to_string())
                    .collect();
                Ok(ResourceScope::Only(uids))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_scope_contains() {
        assert!(ResourceScope::All.contains("key_value_pair:st2kv.system:anything"));

        let scope = ResourceScope::Only(["key_value_pair:st2kv.system:key4".to_string()].into());
        assert!(scope.contains("key_value_pair:st2kv.system:key4"));
        assert!(!scope.contains("key_value_pair:st2kv.system:key5"));
    }
}
