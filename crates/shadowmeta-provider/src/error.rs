//! Provider error types.

use crate::status::StatusCode;
use thiserror::Error;

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors reported by provider handles.
///
/// Neutral outcomes ("nothing to report") are not errors; they are `Ok`
/// values on the individual contract methods.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A provider call failed with a status code.
    #[error("provider call '{operation}' failed with status {code}")]
    CallFailed {
        operation: &'static str,
        code: StatusCode,
    },

    /// A call arrived after the handle was released.
    #[error("provider call '{operation}' after handle release")]
    UseAfterRelease { operation: &'static str },
}

impl ProviderError {
    /// Create a call failure carrying a status code.
    pub fn call_failed(operation: &'static str, code: StatusCode) -> Self {
        Self::CallFailed { operation, code }
    }

    /// The status code carried by this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ProviderError::CallFailed { code, .. } => Some(*code),
            ProviderError::UseAfterRelease { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_failed_carries_code() {
        let err = ProviderError::call_failed("identity", StatusCode::BAD_STATE);
        assert_eq!(err.status_code(), Some(StatusCode::BAD_STATE));
        assert_eq!(
            err.to_string(),
            "provider call 'identity' failed with status 0x80042301"
        );
    }

    #[test]
    fn test_use_after_release_has_no_code() {
        let err = ProviderError::UseAfterRelease { operation: "version" };
        assert_eq!(err.status_code(), None);
    }
}
