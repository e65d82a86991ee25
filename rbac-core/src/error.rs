//! Error types for permission resolution
//!
//! This module defines every error a permission decision can surface.
//! A denied request is not an error: resolvers return `Ok(false)` for it.

use thiserror::Error;

/// Permission resolution error types.
///
/// These errors cover caller mistakes (unknown or mismatched types),
/// registry misconfiguration and persistence outages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// Resource type tag is unknown, or does not fit the context
    #[error("Invalid resource type: {0}")]
    InvalidResourceType(String),

    /// Permission type name is not recognized
    #[error("Unknown permission type: {0}")]
    UnknownPermissionType(String),

    /// Permission type is not valid for the resource type
    #[error("Invalid permission type: {permission_type} (resource type: {resource_type})")]
    InvalidPermissionType {
        /// The rejected permission type
        permission_type: String,
        /// Resource type the permission type was checked against
        resource_type: String,
    },

    /// No resolver is registered for the resource type
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// Grant record failed validation at the persistence boundary
    #[error("Invalid permission grant: {0}")]
    InvalidGrant(String),

    /// Underlying persistence read failed
    #[error("Resolution unavailable: {0}")]
    ResolutionUnavailable(String),
}

/// Result type for permission resolution operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Check if this error should be logged at error level.
    ///
    /// Caller mistakes are surfaced to the caller; only outages
    /// and misconfiguration are server-side faults.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            RbacError::ResolutionUnavailable(_) | RbacError::UnsupportedResourceType(_)
        )
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::InvalidResourceType(_) => "INVALID_RESOURCE_TYPE",
            RbacError::UnknownPermissionType(_) | RbacError::InvalidPermissionType { .. } => "INVALID_PERMISSION_TYPE",
            RbacError::UnsupportedResourceType(_) => "UNSUPPORTED_RESOURCE_TYPE",
            RbacError::InvalidGrant(_) => "INVALID_GRANT",
            RbacError::ResolutionUnavailable(_) => "RESOLUTION_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors() {
        assert!(RbacError::ResolutionUnavailable("timeout".into()).is_server_error());
        assert!(RbacError::UnsupportedResourceType("pack".into()).is_server_error());
        assert!(!RbacError::InvalidResourceType("bogus".into()).is_server_error());
    }

    #[test]
    fn test_error_display() {
        let err = RbacError::InvalidPermissionType {
            permission_type: "action_execute".into(),
            resource_type: "key_value_pair".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid permission type: action_execute (resource type: key_value_pair)"
        );
        assert_eq!(err.error_code(), "INVALID_PERMISSION_TYPE");
    }

    #[test]
    fn test_unknown_permission_type_display() {
        let err = RbacError::UnknownPermissionType("bogus".into());
        assert_eq!(err.to_string(), "Unknown permission type: bogus");
        assert_eq!(err.error_code(), "INVALID_PERMISSION_TYPE");
        assert!(!err.is_server_error());
    }
}
