//! # Resource Types
//!
//! Defines the resource types permissions can be granted on, and the
//! identity scheme resource instances use to compute their uid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RbacError;

/// Resource types that can have permissions granted on them.
///
/// The string tags are shared with the host and are stable; grants and
/// resource uids are prefixed with them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Content packs.
    Pack,
    /// Actions registered by packs.
    Action,
    /// Trigger/action rules.
    Rule,
    /// Action executions.
    Execution,
    /// Webhooks.
    Webhook,
    /// Datastore key-value pairs.
    KeyValuePair,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Pack => "pack",
            ResourceType::Action => "action",
            ResourceType::Rule => "rule",
            ResourceType::Execution => "execution",
            ResourceType::Webhook => "webhook",
            ResourceType::KeyValuePair => "key_value_pair",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// Tags are matched exactly; they are a stable enumeration shared with
    /// the host.
    ///
    /// # Example
    ///
    /// ```
    /// use rbac_core::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("key_value_pair"), Some(ResourceType::KeyValuePair));
    /// assert_eq!(ResourceType::parse("pack"), Some(ResourceType::Pack));
    /// assert_eq!(ResourceType::parse("KEY_VALUE_PAIR"), None);
    /// assert_eq!(ResourceType::parse("sensor"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pack" => Some(ResourceType::Pack),
            "action" => Some(ResourceType::Action),
            "rule" => Some(ResourceType::Rule),
            "execution" => Some(ResourceType::Execution),
            "webhook" => Some(ResourceType::Webhook),
            "key_value_pair" => Some(ResourceType::KeyValuePair),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Pack,
            ResourceType::Action,
            ResourceType::Rule,
            ResourceType::Execution,
            ResourceType::Webhook,
            ResourceType::KeyValuePair,
        ]
    }

    /// Prefix every uid of this resource type starts with (e.g. `key_value_pair:`).
    pub fn uid_prefix(&self) -> String {
        format!("{}:", self.as_str())
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RbacError::InvalidResourceType(s.to_string()))
    }
}

/// Identity scheme of a resource instance.
///
/// The uid is the sole join key between a resource and the grants on it.
pub trait ResourceIdentity: Send + Sync {
    /// Resource type of the instance.
    fn resource_type(&self) -> ResourceType;

    /// Globally unique, type-prefixed identifier of the instance.
    fn uid(&self) -> String;
}

/// Datastore scope for values shared by everyone.
pub const SYSTEM_SCOPE: &str = "st2kv.system";

/// Datastore scope for values owned by a single user.
pub const USER_SCOPE: &str = "st2kv.user";

/// A stored key-value pair.
///
/// Values in the user scope carry their owner, which becomes part of the uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Uid as persisted, if the record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Datastore scope (`st2kv.system` or `st2kv.user`).
    pub scope: String,
    /// Key name.
    pub name: String,
    /// Owner of a user-scoped value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Stored value.
    #[serde(default)]
    pub value: String,
}

impl KeyValuePair {
    /// Create a system-scoped pair.
    pub fn system(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            uid: None,
            scope: SYSTEM_SCOPE.to_string(),
            name: name.into(),
            owner: None,
            value: value.into(),
        }
    }

    /// Create a user-scoped pair owned by `owner`.
    pub fn user(owner: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            uid: None,
            scope: USER_SCOPE.to_string(),
            name: name.into(),
            owner: Some(owner.into()),
            value: value.into(),
        }
    }

    /// Set the uid the record was persisted with.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

impl ResourceIdentity for KeyValuePair {
    fn resource_type(&self) -> ResourceType {
        ResourceType::KeyValuePair
    }

    fn uid(&self) -> String {
        match &self.uid {
            Some(uid) => uid.clone(),
            None => key_value_uid(&self.scope, self.owner.as_deref(), &self.name),
        }
    }
}

/// A key-value pair as submitted through the API, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePairApi {
    /// Datastore scope.
    pub scope: String,
    /// Key name.
    pub name: String,
    /// Owner of a user-scoped value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ResourceIdentity for KeyValuePairApi {
    fn resource_type(&self) -> ResourceType {
        ResourceType::KeyValuePair
    }

    fn uid(&self) -> String {
        key_value_uid(&self.scope, self.user.as_deref(), &self.name)
    }
}

fn key_value_uid(scope: &str, owner: Option<&str>, name: &str) -> String {
    let prefix = ResourceType::KeyValuePair.as_str();
    match owner {
        Some(owner) => format!("{}:{}:{}:{}", prefix, scope, owner, name),
        None => format!("{}:{}:{}", prefix, scope, name),
    }
}
