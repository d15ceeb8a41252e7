//! Metadata adapter error types.

use shadowmeta_provider::{CapabilityLevel, ProviderError, StatusCode};
use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while examining writer metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The underlying provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The operation needs a capability tier this host does not offer.
    #[error("'{operation}' is not supported on this host (requires the {required} tier)")]
    UnsupportedOnHost {
        operation: &'static str,
        required: CapabilityLevel,
    },

    /// The object was used after its handle was released.
    #[error("metadata object used after close")]
    Closed,
}

impl MetadataError {
    /// Create an unsupported-on-host error.
    pub fn unsupported(operation: &'static str, required: CapabilityLevel) -> Self {
        Self::UnsupportedOnHost {
            operation,
            required,
        }
    }

    /// The provider status code carried by this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            MetadataError::Provider(err) => err.status_code(),
            _ => None,
        }
    }

    /// Whether this is the capability fail-fast error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, MetadataError::UnsupportedOnHost { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failure_keeps_status_code() {
        let err: MetadataError =
            ProviderError::call_failed("file_counts", StatusCode::UNEXPECTED).into();
        assert_eq!(err.status_code(), Some(StatusCode::UNEXPECTED));
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_unsupported_names_required_tier() {
        let err = MetadataError::unsupported("backup_schema", CapabilityLevel::Extended);
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "'backup_schema' is not supported on this host (requires the extended tier)"
        );
    }
}
