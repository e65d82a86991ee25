//! Backend facade
//!
//! The single entry point the host calls. It owns the injected store and
//! configuration and builds the resolver for a requested resource type.

use std::sync::Arc;

use rbac_core::{RbacError, RbacResult, ResourceType, User};
use tracing::debug;

use crate::aggregator::RoleAggregator;
use crate::config::{ConfigError, RbacConfig};
use crate::resolvers::{KeyValuePermissionsResolver, Resolver};
use crate::store::RbacStore;

/// RBAC backend handing out permission resolvers.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "memory")]
/// # {
/// use std::sync::Arc;
/// use rbac_backend::{MemoryRbacStore, RbacBackend, RbacConfig};
/// use rbac_core::ResourceType;
///
/// let backend = RbacBackend::new(Arc::new(MemoryRbacStore::new()), RbacConfig::default()).unwrap();
/// assert!(backend.resolver_for(ResourceType::KeyValuePair).is_ok());
/// assert!(backend.resolver_for(ResourceType::Pack).is_err());
/// # }
/// ```
#[derive(Clone)]
pub struct RbacBackend {
    store: Arc<dyn RbacStore>,
    config: RbacConfig,
}

impl std::fmt::Debug for RbacBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacBackend")
            .field("config", &self.config)
            .finish()
    }
}

impl RbacBackend {
    /// Create a backend over `store`.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(store: Arc<dyn RbacStore>, config: RbacConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Resource types a resolver can be built for.
    pub fn supported_resource_types() -> Vec<ResourceType> {
        vec![ResourceType::KeyValuePair]
    }

    /// Build the resolver for a resource type.
    ///
    /// Fails with [`RbacError::UnsupportedResourceType`] for resource types
    /// without a resolver.
    pub fn resolver_for(&self, resource_type: ResourceType) -> RbacResult<Resolver> {
        let aggregator = RoleAggregator::new(Arc::clone(&self.store), &self.config);
        let resolver = match resource_type {
            ResourceType::KeyValuePair => Resolver::KeyValuePair(KeyValuePermissionsResolver::new(aggregator)),
            ResourceType::Pack
            | ResourceType::Action
            | ResourceType::Rule
            | ResourceType::Execution
            | ResourceType::Webhook => {
                return Err(RbacError::UnsupportedResourceType(resource_type.as_str().to_string()));
            }
        };
        debug!(resource_type = %resource_type, "Built permissions resolver");
        Ok(resolver)
    }

    /// Same as [`RbacBackend::resolver_for`], keyed by the resource type tag.
    ///
    /// Unknown tags fail with [`RbacError::InvalidResourceType`].
    pub fn resolver_for_tag(&self, resource_type: &str) -> RbacResult<Resolver> {
        self.resolver_for(resource_type.parse()?)
    }

    /// Look up a user by name.
    pub async fn find_user(&self, name: &str) -> RbacResult<Option<User>> {
        Ok(self.store.find_user(name).await?)
    }

    /// Active configuration.
    pub fn config(&self) -> &RbacConfig {
        &self.config
    }
}
