//! Storage-area management error types.

use shadowmeta_provider::{CapabilityLevel, ProviderError, StatusCode};
use thiserror::Error;

/// Result type for storage-area management operations.
pub type MgmtResult<T> = Result<T, MgmtError>;

/// Errors that can occur while managing storage areas.
#[derive(Debug, Error)]
pub enum MgmtError {
    /// The underlying provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The operation needs a capability tier this host does not offer.
    #[error("'{operation}' is not supported on this host (requires the {required} tier)")]
    UnsupportedOnHost {
        operation: &'static str,
        required: CapabilityLevel,
    },

    /// The manager was used after its handle was released.
    #[error("storage-area manager used after close")]
    Closed,
}

impl MgmtError {
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
            MgmtError::Provider(err) => err.status_code(),
            _ => None,
        }
    }

    /// Whether this is the capability fail-fast error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, MgmtError::UnsupportedOnHost { .. })
    }
}
