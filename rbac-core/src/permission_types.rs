//! # Permission Types
//!
//! Defines the permission types valid for each resource type, and which of
//! them is the "all" type that satisfies every other check for that type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RbacError, RbacResult};
use crate::resources::ResourceType;

/// Permission types that can be granted on resources.
///
/// Every permission type belongs to exactly one resource type. The `*All`
/// variants are supersets: holding one satisfies every other permission
/// type of the same resource type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    // Pack
    /// List packs.
    PackList,
    /// View a pack.
    PackView,
    /// Create a pack.
    PackCreate,
    /// Modify a pack.
    PackModify,
    /// Delete a pack.
    PackDelete,
    /// Install a pack.
    PackInstall,
    /// Uninstall a pack.
    PackUninstall,
    /// Every pack permission.
    PackAll,

    // Action
    /// List actions.
    ActionList,
    /// View an action.
    ActionView,
    /// Create an action.
    ActionCreate,
    /// Modify an action.
    ActionModify,
    /// Delete an action.
    ActionDelete,
    /// Execute an action.
    ActionExecute,
    /// Every action permission.
    ActionAll,

    // Rule
    /// List rules.
    RuleList,
    /// View a rule.
    RuleView,
    /// Create a rule.
    RuleCreate,
    /// Modify a rule.
    RuleModify,
    /// Delete a rule.
    RuleDelete,
    /// Every rule permission.
    RuleAll,

    // Execution
    /// List executions.
    ExecutionList,
    /// View an execution.
    ExecutionView,
    /// Re-run an execution.
    ExecutionReRun,
    /// Stop a running execution.
    ExecutionStop,
    /// Every execution permission.
    ExecutionAll,

    // Webhook
    /// List webhooks.
    WebhookList,
    /// View a webhook.
    WebhookView,
    /// Create a webhook.
    WebhookCreate,
    /// Send to a webhook.
    WebhookSend,
    /// Delete a webhook.
    WebhookDelete,
    /// Every webhook permission.
    WebhookAll,

    // Key-value pair
    /// List key-value pairs.
    KeyValuePairList,
    /// View a key-value pair.
    KeyValuePairView,
    /// Set a key-value pair.
    KeyValuePairSet,
    /// Delete a key-value pair.
    KeyValuePairDelete,
    /// Every key-value pair permission.
    KeyValuePairAll,
}

const PACK_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::PackList,
    PermissionType::PackView,
    PermissionType::PackCreate,
    PermissionType::PackModify,
    PermissionType::PackDelete,
    PermissionType::PackInstall,
    PermissionType::PackUninstall,
    PermissionType::PackAll,
];

const ACTION_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::ActionList,
    PermissionType::ActionView,
    PermissionType::ActionCreate,
    PermissionType::ActionModify,
    PermissionType::ActionDelete,
    PermissionType::ActionExecute,
    PermissionType::ActionAll,
];

const RULE_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::RuleList,
    PermissionType::RuleView,
    PermissionType::RuleCreate,
    PermissionType::RuleModify,
    PermissionType::RuleDelete,
    PermissionType::RuleAll,
];

const EXECUTION_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::ExecutionList,
    PermissionType::ExecutionView,
    PermissionType::ExecutionReRun,
    PermissionType::ExecutionStop,
    PermissionType::ExecutionAll,
];

const WEBHOOK_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::WebhookList,
    PermissionType::WebhookView,
    PermissionType::WebhookCreate,
    PermissionType::WebhookSend,
    PermissionType::WebhookDelete,
    PermissionType::WebhookAll,
];

const KEY_VALUE_PAIR_PERMISSION_TYPES: &[PermissionType] = &[
    PermissionType::KeyValuePairList,
    PermissionType::KeyValuePairView,
    PermissionType::KeyValuePairSet,
    PermissionType::KeyValuePairDelete,
    PermissionType::KeyValuePairAll,
];

/// Get the ordered permission types valid for a resource type.
///
/// # Example
///
/// ```
/// use rbac_core::permission_types::{valid_permission_types, PermissionType};
/// use rbac_core::resources::ResourceType;
///
/// let types = valid_permission_types(ResourceType::KeyValuePair);
/// assert_eq!(types.first(), Some(&PermissionType::KeyValuePairList));
/// assert_eq!(types.last(), Some(&PermissionType::KeyValuePairAll));
/// ```
pub fn valid_permission_types(resource_type: ResourceType) -> &'static [PermissionType] {
    match resource_type {
        ResourceType::Pack => PACK_PERMISSION_TYPES,
        ResourceType::Action => ACTION_PERMISSION_TYPES,
        ResourceType::Rule => RULE_PERMISSION_TYPES,
        ResourceType::Execution => EXECUTION_PERMISSION_TYPES,
        ResourceType::Webhook => WEBHOOK_PERMISSION_TYPES,
        ResourceType::KeyValuePair => KEY_VALUE_PAIR_PERMISSION_TYPES,
    }
}

/// Get the "all" permission type of a resource type.
pub fn all_permission_type(resource_type: ResourceType) -> PermissionType {
    match resource_type {
        ResourceType::Pack => PermissionType::PackAll,
        ResourceType::Action => PermissionType::ActionAll,
        ResourceType::Rule => PermissionType::RuleAll,
        ResourceType::Execution => PermissionType::ExecutionAll,
        ResourceType::Webhook => PermissionType::WebhookAll,
        ResourceType::KeyValuePair => PermissionType::KeyValuePairAll,
    }
}

/// Same as [`valid_permission_types`], keyed by the resource type tag.
///
/// Fails with [`RbacError::InvalidResourceType`] for unknown tags.
pub fn valid_permission_types_for(resource_type: &str) -> RbacResult<&'static [PermissionType]> {
    Ok(valid_permission_types(resource_type.parse()?))
}

/// Same as [`all_permission_type`], keyed by the resource type tag.
///
/// Fails with [`RbacError::InvalidResourceType`] for unknown tags.
pub fn all_permission_type_for(resource_type: &str) -> RbacResult<PermissionType> {
    Ok(all_permission_type(resource_type.parse()?))
}

impl PermissionType {
    /// Get the string representation of the permission type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::PackList => "pack_list",
            PermissionType::PackView => "pack_view",
            PermissionType::PackCreate => "pack_create",
            PermissionType::PackModify => "pack_modify",
            PermissionType::PackDelete => "pack_delete",
            PermissionType::PackInstall => "pack_install",
            PermissionType::PackUninstall => "pack_uninstall",
            PermissionType::PackAll => "pack_all",
            PermissionType::ActionList => "action_list",
            PermissionType::ActionView => "action_view",
            PermissionType::ActionCreate => "action_create",
            PermissionType::ActionModify => "action_modify",
            PermissionType::ActionDelete => "action_delete",
            PermissionType::ActionExecute => "action_execute",
            PermissionType::ActionAll => "action_all",
            PermissionType::RuleList => "rule_list",
            PermissionType::RuleView => "rule_view",
            PermissionType::RuleCreate => "rule_create",
            PermissionType::RuleModify => "rule_modify",
            PermissionType::RuleDelete => "rule_delete",
            PermissionType::RuleAll => "rule_all",
            PermissionType::ExecutionList => "execution_list",
            PermissionType::ExecutionView => "execution_view",
            PermissionType::ExecutionReRun => "execution_re_run",
            PermissionType::ExecutionStop => "execution_stop",
            PermissionType::ExecutionAll => "execution_all",
            PermissionType::WebhookList => "webhook_list",
            PermissionType::WebhookView => "webhook_view",
            PermissionType::WebhookCreate => "webhook_create",
            PermissionType::WebhookSend => "webhook_send",
            PermissionType::WebhookDelete => "webhook_delete",
            PermissionType::WebhookAll => "webhook_all",
            PermissionType::KeyValuePairList => "key_value_pair_list",
            PermissionType::KeyValuePairView => "key_value_pair_view",
            PermissionType::KeyValuePairSet => "key_value_pair_set",
            PermissionType::KeyValuePairDelete => "key_value_pair_delete",
            PermissionType::KeyValuePairAll => "key_value_pair_all",
        }
    }

    /// Parse permission type from string representation.
    ///
    /// Names are matched exactly.
    ///
    /// # Example
    ///
    /// ```
    /// use rbac_core::permission_types::PermissionType;
    ///
    /// assert_eq!(PermissionType::parse("key_value_pair_view"), Some(PermissionType::KeyValuePairView));
    /// assert_eq!(PermissionType::parse("key_value_pair_execute"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|pt| pt.as_str() == s)
    }

    /// Get all permission types, grouped by resource type.
    pub fn all() -> Vec<Self> {
        ResourceType::all()
            .into_iter()
            .flat_map(|rt| valid_permission_types(rt).iter().copied())
            .collect()
    }

    /// Get the resource type this permission type belongs to.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            PermissionType::PackList
            | PermissionType::PackView
            | PermissionType::PackCreate
            | PermissionType::PackModify
            | PermissionType::PackDelete
            | PermissionType::PackInstall
            | PermissionType::PackUninstall
            | PermissionType::PackAll => ResourceType::Pack,
            PermissionType::ActionList
            | PermissionType::ActionView
            | PermissionType::ActionCreate
            | PermissionType::ActionModify
            | PermissionType::ActionDelete
            | PermissionType::ActionExecute
            | PermissionType::ActionAll => ResourceType::Action,
            PermissionType::RuleList
            | PermissionType::RuleView
            | PermissionType::RuleCreate
            | PermissionType::RuleModify
            | PermissionType::RuleDelete
            | PermissionType::RuleAll => ResourceType::Rule,
            PermissionType::ExecutionList
            | PermissionType::ExecutionView
            | PermissionType::ExecutionReRun
            | PermissionType::ExecutionStop
            | PermissionType::ExecutionAll => ResourceType::Execution,
            PermissionType::WebhookList
            | PermissionType::WebhookView
            | PermissionType::WebhookCreate
            | PermissionType::WebhookSend
            | PermissionType::WebhookDelete
            | PermissionType::WebhookAll => ResourceType::Webhook,
            PermissionType::KeyValuePairList
            | PermissionType::KeyValuePairView
            | PermissionType::KeyValuePairSet
            | PermissionType::KeyValuePairDelete
            | PermissionType::KeyValuePairAll => ResourceType::KeyValuePair,
        }
    }

    /// Check if this permission type is valid for a resource type.
    pub fn is_valid_for(&self, resource_type: ResourceType) -> bool {
        self.resource_type() == resource_type
    }

    /// Check if this is the "all" permission type of its resource type.
    pub fn is_all(&self) -> bool {
        *self == all_permission_type(self.resource_type())
    }

    /// Check if this is a read-only permission type.
    ///
    /// Only the view and list types are read-only; these are the ones the
    /// observer system role is allowed.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            PermissionType::PackList
                | PermissionType::PackView
                | PermissionType::ActionList
                | PermissionType::ActionView
                | PermissionType::RuleList
                | PermissionType::RuleView
                | PermissionType::ExecutionList
                | PermissionType::ExecutionView
                | PermissionType::WebhookList
                | PermissionType::WebhookView
                | PermissionType::KeyValuePairList
                | PermissionType::KeyValuePairView
        )
    }

    /// Fail with [`RbacError::InvalidPermissionType`] unless this type is
    /// valid for `resource_type`.
    pub fn ensure_valid_for(&self, resource_type: ResourceType) -> RbacResult<()> {
        if self.is_valid_for(resource_type) {
            Ok(())
        } else {
            Err(RbacError::InvalidPermissionType {
                permission_type: self.as_str().to_string(),
                resource_type: resource_type.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RbacError::UnknownPermissionType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_permission_type_parsing() {
        assert_eq!(PermissionType::parse("key_value_pair_list"), Some(PermissionType::KeyValuePairList));
        assert_eq!(PermissionType::parse("key_value_pair_set"), Some(PermissionType::KeyValuePairSet));
        assert_eq!(PermissionType::parse("KEY_VALUE_PAIR_SET"), None);
        assert_eq!(PermissionType::parse("execution_re_run"), Some(PermissionType::ExecutionReRun));
        assert_eq!(PermissionType::parse("key_value_pair_execute"), None);
        let err = "bogus".parse::<PermissionType>().unwrap_err();
        assert_eq!(err, RbacError::UnknownPermissionType("bogus".to_string()));
        assert_eq!(err.to_string(), "Unknown permission type: bogus");
        assert_eq!(err.error_code(), "INVALID_PERMISSION_TYPE");
    }

    #[test]
    fn test_key_value_pair_registry() {
        assert_eq!(
            valid_permission_types(ResourceType::KeyValuePair),
            &[
                PermissionType::KeyValuePairList,
                PermissionType::KeyValuePairView,
                PermissionType::KeyValuePairSet,
                PermissionType::KeyValuePairDelete,
                PermissionType::KeyValuePairAll,
            ]
        );
        assert_eq!(all_permission_type(ResourceType::KeyValuePair), PermissionType::KeyValuePairAll);
    }

    #[test]
    fn test_registry_by_tag() {
        assert_eq!(
            all_permission_type_for("action").unwrap(),
            PermissionType::ActionAll
        );
        assert_eq!(
            valid_permission_types_for("sensor").unwrap_err(),
            RbacError::InvalidResourceType("sensor".to_string())
        );
        assert!(all_permission_type_for("").is_err());
    }

    #[test]
    fn test_is_read_only() {
        assert!(PermissionType::KeyValuePairView.is_read_only());
        assert!(PermissionType::KeyValuePairList.is_read_only());
        assert!(!PermissionType::KeyValuePairSet.is_read_only());
        assert!(!PermissionType::KeyValuePairDelete.is_read_only());
        assert!(!PermissionType::KeyValuePairAll.is_read_only());
        assert!(!PermissionType::ActionExecute.is_read_only());
    }

    #[test]
    fn test_ensure_valid_for() {
        assert!(PermissionType::KeyValuePairSet
            .ensure_valid_for(ResourceType::KeyValuePair)
            .is_ok());
        let err = PermissionType::ActionExecute
            .ensure_valid_for(ResourceType::KeyValuePair)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PERMISSION_TYPE");
    }

    #[test]
    fn test_all_permission_types_count() {
        assert_eq!(PermissionType::all().len(), 37);
    }

    proptest! {
        #[test]
        fn every_resource_type_has_exactly_one_all_type(idx in 0usize..6) {
            let rt = ResourceType::all()[idx];
            let types = valid_permission_types(rt);
            prop_assert!(!types.is_empty());
            prop_assert_eq!(types.iter().filter(|pt| pt.is_all()).count(), 1);
            prop_assert!(types.contains(&all_permission_type(rt)));
            prop_assert!(types.iter().all(|pt| pt.resource_type() == rt));
        }

        #[test]
        fn string_form_round_trips(idx in 0usize..37) {
            let pt = PermissionType::all()[idx];
            prop_assert_eq!(pt.as_str().parse::<PermissionType>(), Ok(pt));
        }
    }
}
