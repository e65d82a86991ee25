//! Built-in system roles
//!
//! System roles are never persisted and carry no grants. Holding one
//! short-circuits grant evaluation.

use serde::{Deserialize, Serialize};

use crate::permission_types::PermissionType;
use crate::resources::ResourceType;

/// Built-in roles with engine-level semantics.
///
/// - **Admin**: every permission on every resource
/// - **Observer**: the read-only (view and list) permissions on every resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    /// Full access.
    Admin,
    /// Read-only access.
    Observer,
}

impl SystemRole {
    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::Observer => "observer",
        }
    }

    /// Parse a role name into a system role.
    ///
    /// Role names are matched exactly; `Admin` is an ordinary role.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbac_core::system_roles::SystemRole;
    ///
    /// assert_eq!(SystemRole::parse("admin"), Some(SystemRole::Admin));
    /// assert_eq!(SystemRole::parse("kv_admin"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(SystemRole::Admin),
            "observer" => Some(SystemRole::Observer),
            _ => None,
        }
    }

    /// Check if a role name is reserved for a system role.
    pub fn is_system_role(name: &str) -> bool {
        Self::parse(name).is_some()
    }
}

/// Outcome of the system role policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Authorized without looking at grants.
    Allow,
    /// Refused without looking at grants.
    Deny,
    /// Defer to grant evaluation.
    NoOpinion,
}

/// Decides requests that system roles settle on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRolePolicy;

impl SystemRolePolicy {
    /// Apply the system role rules, in order:
    ///
    /// 1. `admin` allows everything.
    /// 2. `observer` allows read-only permission types.
    /// 3. Anything else has no opinion.
    pub fn decide<'a, I>(&self, role_names: I, resource_type: ResourceType, permission_type: PermissionType) -> Decision
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut is_observer = false;
        for name in role_names {
            match SystemRole::parse(name) {
                Some(SystemRole::Admin) => return Decision::Allow,
                Some(SystemRole::Observer) => is_observer = true,
                None => {}
            }
        }

        if is_observer && permission_type.is_valid_for(resource_type) && permission_type.is_read_only() {
            return Decision::Allow;
        }

        Decision::NoOpinion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission_types::valid_permission_types;

    const KV: ResourceType = ResourceType::KeyValuePair;

    #[test]
    fn test_system_role_names() {
        for role in [SystemRole::Admin, SystemRole::Observer] {
            assert_eq!(SystemRole::parse(role.as_str()), Some(role));
            assert!(SystemRole::is_system_role(role.as_str()));
        }
        assert_eq!(SystemRole::Admin.as_str(), "admin");
        assert_eq!(SystemRole::Observer.as_str(), "observer");
    }

    #[test]
    fn test_admin_allows_everything() {
        let policy = SystemRolePolicy;
        for rt in ResourceType::all() {
            for pt in valid_permission_types(rt) {
                assert_eq!(policy.decide(["admin"], rt, *pt), Decision::Allow);
            }
        }
    }

    #[test]
    fn test_observer_read_only() {
        let policy = SystemRolePolicy;
        assert_eq!(policy.decide(["observer"], KV, PermissionType::KeyValuePairView), Decision::Allow);
        assert_eq!(policy.decide(["observer"], KV, PermissionType::KeyValuePairList), Decision::Allow);
        assert_eq!(policy.decide(["observer"], KV, PermissionType::KeyValuePairSet), Decision::NoOpinion);
        assert_eq!(policy.decide(["observer"], KV, PermissionType::KeyValuePairDelete), Decision::NoOpinion);
        assert_eq!(policy.decide(["observer"], KV, PermissionType::KeyValuePairAll), Decision::NoOpinion);
    }

    #[test]
    fn test_admin_wins_over_observer() {
        let policy = SystemRolePolicy;
        assert_eq!(
            policy.decide(["observer", "admin"], KV, PermissionType::KeyValuePairDelete),
            Decision::Allow
        );
    }

    #[test]
    fn test_ordinary_roles_have_no_opinion() {
        let policy = SystemRolePolicy;
        assert_eq!(policy.decide(["kv_admin", "Admin"], KV, PermissionType::KeyValuePairView), Decision::NoOpinion);
        assert_eq!(policy.decide(Vec::<&str>::new(), KV, PermissionType::KeyValuePairView), Decision::NoOpinion);
    }
}
