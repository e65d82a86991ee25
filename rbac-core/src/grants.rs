//! # Permission Grants
//!
//! A grant binds one resource instance (by uid) to a set of permission
//! types. Grants are validated when constructed or deserialized, so the
//! matcher never re-checks their shape.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RbacError, RbacResult};
use crate::permission_types::{all_permission_type, PermissionType};
use crate::resources::ResourceType;

/// Identifier of a stored permission grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(pub Uuid);

impl GrantId {
    /// Generate a fresh grant id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A permission grant on exactly one resource instance.
///
/// # Example
///
/// ```
/// use rbac_core::grants::PermissionGrant;
/// use rbac_core::permission_types::PermissionType;
/// use rbac_core::resources::ResourceType;
///
/// let grant = PermissionGrant::new(
///     "key_value_pair:st2kv.system:key6",
///     ResourceType::KeyValuePair,
///     [PermissionType::KeyValuePairAll],
/// )
/// .unwrap();
///
/// assert!(grant.matches("key_value_pair:st2kv.system:key6", PermissionType::KeyValuePairDelete));
/// assert!(!grant.matches("key_value_pair:st2kv.system:key7", PermissionType::KeyValuePairView));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPermissionGrant", into = "RawPermissionGrant")]
pub struct PermissionGrant {
    id: GrantId,
    resource_uid: String,
    resource_type: ResourceType,
    permission_types: BTreeSet<PermissionType>,
}

/// Unvalidated wire shape of a grant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPermissionGrant {
    #[serde(default)]
    id: GrantId,
    resource_uid: String,
    resource_type: ResourceType,
    permission_types: Vec<PermissionType>,
}

impl PermissionGrant {
    /// Create a new grant with a fresh id.
    ///
    /// # Errors
    ///
    /// [`RbacError::InvalidGrant`] if the permission types are empty, the
    /// uid does not belong to `resource_type`, or a permission type is not
    /// valid for `resource_type`.
    pub fn new<I>(
        resource_uid: impl Into<String>,
        resource_type: ResourceType,
        permission_types: I,
    ) -> RbacResult<Self>
    where
        I: IntoIterator<Item = PermissionType>,
    {
        Self::with_id(GrantId::new(), resource_uid, resource_type, permission_types)
    }

    /// Create a grant with a known id, as read back from storage.
    pub fn with_id<I>(
        id: GrantId,
        resource_uid: impl Into<String>,
        resource_type: ResourceType,
        permission_types: I,
    ) -> RbacResult<Self>
    where
        I: IntoIterator<Item = PermissionType>,
    {
        let resource_uid = resource_uid.into();
        let permission_types: BTreeSet<PermissionType> = permission_types.into_iter().collect();

        if permission_types.is_empty() {
            return Err(RbacError::InvalidGrant(format!(
                "grant on {} has no permission types",
                resource_uid
            )));
        }
        if !resource_uid.starts_with(&resource_type.uid_prefix()) {
            return Err(RbacError::InvalidGrant(format!(
                "uid {} is not a {} uid",
                resource_uid, resource_type
            )));
        }
        if let Some(invalid) = permission_types.iter().find(|pt| !pt.is_valid_for(resource_type)) {
            return Err(RbacError::InvalidGrant(format!(
                "permission type {} is not valid for {}",
                invalid, resource_type
            )));
        }

        Ok(Self {
            id,
            resource_uid,
            resource_type,
            permission_types,
        })
    }

    /// Grant id.
    pub fn id(&self) -> GrantId {
        self.id
    }

    /// Uid of the granted resource instance.
    pub fn resource_uid(&self) -> &str {
        &self.resource_uid
    }

    /// Resource type of the granted instance.
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Granted permission types.
    pub fn permission_types(&self) -> &BTreeSet<PermissionType> {
        &self.permission_types
    }

    /// Check if the grant carries a permission type, directly or through the
    /// resource type's "all" type.
    pub fn grants_permission_type(&self, permission_type: PermissionType) -> bool {
        self.permission_types.contains(&permission_type)
            || self
                .permission_types
                .contains(&all_permission_type(self.resource_type))
    }

    /// Check if this grant authorizes `permission_type` on `resource_uid`.
    ///
    /// Uids are compared exactly; a grant never covers other uids sharing
    /// its scope or prefix.
    pub fn matches(&self, resource_uid: &str, permission_type: PermissionType) -> bool {
        self.resource_uid == resource_uid && self.grants_permission_type(permission_type)
    }
}

impl TryFrom<RawPermissionGrant> for PermissionGrant {
    type Error = RbacError;

    fn try_from(raw: RawPermissionGrant) -> Result<Self, Self::Error> {
        Self::with_id(raw.id, raw.resource_uid, raw.resource_type, raw.permission_types)
    }
}

impl From<PermissionGrant> for RawPermissionGrant {
    fn from(grant: PermissionGrant) -> Self {
        Self {
            id: grant.id,
            resource_uid: grant.resource_uid,
            resource_type: grant.resource_type,
            permission_types: grant.permission_types.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY1: &str = "key_value_pair:st2kv.user:testu:key1";
    const KEY2: &str = "key_value_pair:st2kv.user:testu:key2";

    fn kv_grant(uid: &str, types: &[PermissionType]) -> PermissionGrant {
        PermissionGrant::new(uid, ResourceType::KeyValuePair, types.iter().copied()).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let grant = kv_grant(KEY1, &[PermissionType::KeyValuePairView]);
        assert!(grant.matches(KEY1, PermissionType::KeyValuePairView));
        assert!(!grant.matches(KEY1, PermissionType::KeyValuePairList));
        assert!(!grant.matches(KEY2, PermissionType::KeyValuePairView));
    }

    #[test]
    fn test_no_prefix_match() {
        let grant = kv_grant("key_value_pair:st2kv.user:testu", &[PermissionType::KeyValuePairAll]);
        assert!(!grant.matches(KEY1, PermissionType::KeyValuePairView));
    }

    #[test]
    fn test_all_absorbs_every_type() {
        let grant = kv_grant(KEY1, &[PermissionType::KeyValuePairAll]);
        for pt in crate::permission_types::valid_permission_types(ResourceType::KeyValuePair) {
            assert!(grant.matches(KEY1, *pt));
        }
    }

    #[test]
    fn test_empty_permission_types_rejected() {
        let err = PermissionGrant::new(KEY1, ResourceType::KeyValuePair, Vec::new()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GRANT");
    }

    #[test]
    fn test_foreign_permission_type_rejected() {
        let err = PermissionGrant::new(KEY1, ResourceType::KeyValuePair, [PermissionType::ActionExecute])
            .unwrap_err();
        assert!(matches!(err, RbacError::InvalidGrant(_)));
    }

    #[test]
    fn test_foreign_uid_rejected() {
        let err = PermissionGrant::new("action:core.local", ResourceType::KeyValuePair, [PermissionType::KeyValuePairView])
            .unwrap_err();
        assert!(matches!(err, RbacError::InvalidGrant(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok = r#"{
            "id": "0190a1f0-0000-7000-8000-000000000001",
            "resource_uid": "key_value_pair:st2kv.system:key4",
            "resource_type": "key_value_pair",
            "permission_types": ["key_value_pair_delete"]
        }"#;
        let grant: PermissionGrant = serde_json::from_str(ok).unwrap();
        assert_eq!(grant.resource_type(), ResourceType::KeyValuePair);
        assert!(grant.matches("key_value_pair:st2kv.system:key4", PermissionType::KeyValuePairDelete));

        let empty = r#"{
            "resource_uid": "key_value_pair:st2kv.system:key4",
            "resource_type": "key_value_pair",
            "permission_types": []
        }"#;
        assert!(serde_json::from_str::<PermissionGrant>(empty).is_err());

        let mismatched = r#"{
            "resource_uid": "key_value_pair:st2kv.system:key4",
            "resource_type": "key_value_pair",
            "permission_types": ["rule_view"]
        }"#;
        assert!(serde_json::from_str::<PermissionGrant>(mismatched).is_err());
    }

    fn key_value_type() -> impl Strategy<Value = PermissionType> {
        prop::sample::select(
            crate::permission_types::valid_permission_types(ResourceType::KeyValuePair).to_vec(),
        )
    }

    proptest! {
        #[test]
        fn grant_never_matches_other_uid(
            a in "[a-z0-9]{1,8}",
            b in "[a-z0-9]{1,8}",
            pt in key_value_type(),
        ) {
            prop_assume!(a != b);
            let uid_a = format!("key_value_pair:st2kv.system:{}", a);
            let uid_b = format!("key_value_pair:st2kv.system:{}", b);
            let grant = kv_grant(&uid_a, &[PermissionType::KeyValuePairAll]);
            prop_assert!(!grant.matches(&uid_b, pt));
            prop_assert!(grant.matches(&uid_a, pt));
        }

        #[test]
        fn specific_grant_matches_only_its_types(
            granted in key_value_type(),
            requested in key_value_type(),
        ) {
            let grant = kv_grant(KEY1, &[granted]);
            let expected = granted == requested || granted == PermissionType::KeyValuePairAll;
            prop_assert_eq!(grant.matches(KEY1, requested), expected);
        }
    }
}
