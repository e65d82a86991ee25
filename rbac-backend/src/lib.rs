//! # RBAC Backend
//!
//! Permission resolvers over a pluggable persistence layer.
//!
//! ## Overview
//!
//! Control flow for a single decision:
//!
//! ```text
//! host -> RbacBackend::resolver_for(resource type)
//!      -> Resolver (per resource type)
//!           -> RoleAggregator: effective assignments, roles, grants   (RbacStore reads)
//!           -> SystemRolePolicy: admin / observer short-circuit
//!           -> PermissionGrant::matches for each candidate grant
//!      -> Ok(bool)
//! ```
//!
//! Resolvers hold no mutable state, so a backend can be shared across tasks
//! without locking. Storage failures surface as
//! [`RbacError::ResolutionUnavailable`](rbac_core::RbacError::ResolutionUnavailable)
//! and must not be read as either allow or deny.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rbac_backend::{PermissionsResolver, RbacBackend, RbacConfig};
//! use rbac_core::{KeyValuePair, PermissionGrant, PermissionType, ResourceIdentity, ResourceType, Role, RoleAssignment, User};
//!
//! # #[cfg(feature = "memory")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use rbac_backend::MemoryRbacStore;
//!
//! let store = MemoryRbacStore::new();
//! let kvp = KeyValuePair::system("key6", "val6");
//! let grant = store
//!     .add_or_update_permission_grant(PermissionGrant::new(
//!         kvp.uid(),
//!         ResourceType::KeyValuePair,
//!         [PermissionType::KeyValuePairAll],
//!     )?)
//!     .await;
//! store.add_or_update_role(Role::new("kv_all").with_grants([grant.id()])).await;
//! store
//!     .add_or_update_role_assignment(RoleAssignment::new("u2", "kv_all", "assignments/u2.yaml"))
//!     .await;
//!
//! let backend = RbacBackend::new(Arc::new(store), RbacConfig::default())?;
//! let resolver = backend.resolver_for(ResourceType::KeyValuePair)?;
//! let allowed = resolver
//!     .user_has_resource_db_permission(&User::new("u2"), &kvp, PermissionType::KeyValuePairDelete)
//!     .await?;
//! assert!(allowed);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod backend;
pub mod config;
#[cfg(feature = "memory")]
pub mod memory;
pub mod resolvers;
pub mod store;

// Re-export main types
pub use aggregator::RoleAggregator;
pub use backend::RbacBackend;
pub use config::{ConfigError, RbacConfig};
#[cfg(feature = "memory")]
pub use memory::MemoryRbacStore;
pub use resolvers::{KeyValuePermissionsResolver, PermissionsResolver, ResourceScope, Resolver};
pub use store::{RbacStore, StoreError, StoreResult};
