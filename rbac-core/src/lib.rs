//! # RBAC Core
//!
//! Pure decision primitives for role-based permission resolution.
//!
//! ## Overview
//!
//! The rbac-core crate handles:
//! - **Resource types**: the resource tags grants are scoped to
//! - **Permission types**: per resource type, the valid permission types and
//!   the "all" superset type
//! - **Grants**: a resource uid bound to a set of permission types
//! - **System roles**: `admin` and `observer`, which bypass grant evaluation
//!
//! ## Architecture
//!
//! ```text
//! Grant = Resource UID + {Permission Type}
//!
//! Examples:
//!   key_value_pair:st2kv.system:key6           {key_value_pair_all}
//!   key_value_pair:st2kv.user:testu:key1       {key_value_pair_view}
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rbac_core::{PermissionGrant, PermissionType, ResourceType};
//!
//! let grant = PermissionGrant::new(
//!     "key_value_pair:st2kv.user:testu:key1",
//!     ResourceType::KeyValuePair,
//!     [PermissionType::KeyValuePairView],
//! )
//! .unwrap();
//!
//! assert!(grant.matches("key_value_pair:st2kv.user:testu:key1", PermissionType::KeyValuePairView));
//! assert!(!grant.matches("key_value_pair:st2kv.user:testu:key1", PermissionType::KeyValuePairList));
//!
//! // No hierarchy: uids sharing a prefix are distinct resources
//! assert!(!grant.matches("key_value_pair:st2kv.user:testu:key10", PermissionType::KeyValuePairView));
//! ```
//!
//! ## Matching Rules
//!
//! - Uids are compared exactly
//! - The `*_all` type of a resource type satisfies every other type of it

pub mod error;
pub mod grants;
pub mod models;
pub mod permission_types;
pub mod resources;
pub mod system_roles;

// Re-export main types for convenience
pub use error::{RbacError, RbacResult};
pub use grants::{GrantId, PermissionGrant};
pub use models::{Role, RoleAssignment, User};
pub use permission_types::{all_permission_type, valid_permission_types, PermissionType};
pub use resources::{KeyValuePair, KeyValuePairApi, ResourceIdentity, ResourceType};
pub use system_roles::{Decision, SystemRole, SystemRolePolicy};
