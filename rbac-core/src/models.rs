//! Identity and role records
//!
//! Users, roles and role assignments as read from the persistence layer.
//! The resolution engine never mutates these; they are plain value structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grants::GrantId;

/// A user, identified by a unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Unique user name
    pub name: String,
}

impl User {
    /// Create a user with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named set of permission grants.
///
/// Grants are referenced by id, not embedded.
///
/// # Examples
///
/// ```
/// use rbac_core::grants::GrantId;
/// use rbac_core::models::Role;
///
/// let grant_id = GrantId::new();
/// let role = Role::new("kv_readers").with_grants([grant_id]);
/// assert_eq!(role.permission_grants, vec![grant_id]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name
    pub name: String,

    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Ids of the grants this role carries
    #[serde(default)]
    pub permission_grants: Vec<GrantId>,
}

impl Role {
    /// Create a role with no grants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            permission_grants: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add grant references to the role.
    pub fn with_grants<I>(mut self, grants: I) -> Self
    where
        I: IntoIterator<Item = GrantId>,
    {
        self.permission_grants.extend(grants);
        self
    }
}

/// Binds a user to a role.
///
/// Assignments are additive: a user holds the union of every effective
/// assignment. `source` records where the assignment came from, typically the
/// definition file it was loaded from.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use rbac_core::models::RoleAssignment;
///
/// let assignment = RoleAssignment::new("stanley", "observer", "assignments/stanley.yaml");
/// assert!(assignment.is_effective_at(Utc::now()));
///
/// let expired = assignment.with_expiry(Utc::now() - Duration::hours(1));
/// assert!(!expired.is_effective_at(Utc::now()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Name of the assigned user
    pub user: String,

    /// Name of the assigned role
    pub role: String,

    /// Where the assignment originated
    pub source: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the assignment is active
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Whether the assignment was synced from a remote group mapping
    #[serde(default)]
    pub is_remote: bool,

    /// When the assignment stops being effective
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl RoleAssignment {
    /// Create an active, local, non-expiring assignment.
    pub fn new(user: impl Into<String>, role: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            role: role.into(),
            source: source.into(),
            description: None,
            is_active: true,
            is_remote: false,
            expires_at: None,
        }
    }

    /// Mark the assignment as synced from a remote group mapping.
    pub fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }

    /// Mark the assignment inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Set the expiry time.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check if the assignment is active and unexpired at `now`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_builder() {
        let grant = GrantId::new();
        let role = Role::new("kv_reader")
            .with_description("Read access to shared keys")
            .with_grants([grant]);
        assert_eq!(role.name, "kv_reader");
        assert_eq!(role.description.as_deref(), Some("Read access to shared keys"));
        assert_eq!(role.permission_grants, vec![grant]);
        assert_eq!(Role::new("bare").description, None);
    }

    #[test]
    fn test_inactive_assignment_not_effective() {
        let assignment = RoleAssignment::new("u", "r", "assignments/u.yaml").deactivated();
        assert!(!assignment.is_effective_at(Utc::now()));
    }

    #[test]
    fn test_future_expiry_effective() {
        let now = Utc::now();
        let assignment = RoleAssignment::new("u", "r", "assignments/u.yaml").with_expiry(now + Duration::days(1));
        assert!(assignment.is_effective_at(now));
        assert!(!assignment.is_effective_at(now + Duration::days(2)));
    }

    #[test]
    fn test_assignment_deserialize_defaults() {
        let json = r#"{"user": "u", "role": "r", "source": "assignments/u.yaml"}"#;
        let assignment: RoleAssignment = serde_json::from_str(json).unwrap();
        assert!(assignment.is_active);
        assert!(!assignment.is_remote);
        assert!(assignment.expires_at.is_none());
    }

    #[test]
    fn test_role_deserialize() {
        let json = r#"{
            "name": "kv_writers",
            "permission_grants": ["0190a1f0-0000-7000-8000-000000000001"]
        }"#;
        let role: Role = serde_json::from_str(json).unwrap();
        assert_eq!(role.permission_grants.len(), 1);
        assert!(role.description.is_none());
    }
}
