//! Writer metadata versioning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Writer-declared metadata version.
///
/// Defaults to `0.0`, the value reported when the versioning tier is
/// unavailable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct WriterVersion {
    pub major: u32,
    pub minor: u32,
}

impl WriterVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for WriterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_zero() {
        assert_eq!(WriterVersion::default(), WriterVersion::new(0, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(WriterVersion::new(1, 2).to_string(), "1.2");
    }

    #[test]
    fn test_ordering() {
        assert!(WriterVersion::new(1, 9) < WriterVersion::new(2, 0));
        assert!(WriterVersion::new(1, 0) < WriterVersion::new(1, 1));
    }
}
