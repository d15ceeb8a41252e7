//! Status codes and load outcomes.
//!
//! Providers report three kinds of outcome: affirmative success (an `Ok`
//! value), neutral/declined (an `Ok` value meaning "nothing to report"),
//! and failure (an error carrying a [`StatusCode`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric status carried by a failed provider call.
///
/// Codes are opaque to this layer. A handful of well-known snapshot
/// service statuses are provided for matching and for scripting fakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// The operation is not valid in the provider's current state.
    pub const BAD_STATE: StatusCode = StatusCode::from_bits(0x8004_2301);
    /// An unexpected provider failure.
    pub const UNEXPECTED: StatusCode = StatusCode::from_bits(0x8004_2302);
    /// The requested object was not found.
    pub const OBJECT_NOT_FOUND: StatusCode = StatusCode::from_bits(0x8004_2308);
    /// The volume is not supported by the provider.
    pub const VOLUME_NOT_SUPPORTED: StatusCode = StatusCode::from_bits(0x8004_230c);
    /// The given metadata document is not valid.
    pub const INVALID_DOCUMENT: StatusCode = StatusCode::from_bits(0x8004_2311);
    /// The maximum number of storage-area associations has been reached.
    pub const MAXIMUM_DIFF_AREA_ASSOCIATIONS_REACHED: StatusCode =
        StatusCode::from_bits(0x8004_2312);
    /// Access denied by the host environment.
    pub const ACCESS_DENIED: StatusCode = StatusCode::from_bits(0x8007_0005);
    /// An argument was rejected before reaching the provider.
    pub const INVALID_ARGUMENT: StatusCode = StatusCode::from_bits(0x8007_0057);

    /// Build a status from its unsigned bit pattern.
    pub const fn from_bits(bits: u32) -> Self {
        StatusCode(bits as i32)
    }

    /// The unsigned bit pattern of this status.
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// Whether the failure bit is set.
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.bits())
    }
}

/// Result of asking a provider to load a metadata document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOutcome {
    /// The provider accepted the document and replaced its state.
    Applied,
    /// The provider declined the document; prior state is untouched.
    Declined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_is_hex() {
        assert_eq!(StatusCode::OBJECT_NOT_FOUND.to_string(), "0x80042308");
        assert_eq!(StatusCode::from_bits(0x1).to_string(), "0x00000001");
    }

    #[test]
    fn test_status_bits_round_trip() {
        let code = StatusCode::from_bits(0x8004_2311);
        assert_eq!(code.bits(), 0x8004_2311);
        assert_eq!(code, StatusCode::INVALID_DOCUMENT);
    }

    #[test]
    fn test_failure_bit() {
        assert!(StatusCode::BAD_STATE.is_failure());
        assert!(!StatusCode::from_bits(0).is_failure());
    }
}
