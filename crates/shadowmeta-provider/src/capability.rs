//! Runtime capability tiers.
//!
//! Availability of the extended provider surfaces is a runtime question:
//! the host environment advertises what it offers, each handle reports
//! what it implements, and adapters consult both at call time. Gated
//! operations below the required tier either degrade to a documented
//! default or fail fast without touching the provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered capability tiers for provider surfaces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CapabilityLevel {
    /// The baseline contract every provider offers.
    Base,
    /// Extended identity and backup-schema queries; volatile
    /// storage-area resizing.
    Extended,
    /// Writer versioning and snapshot-exclusion queries; storage-area
    /// protection control.
    #[default]
    Extended2,
}

impl CapabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityLevel::Base => "base",
            CapabilityLevel::Extended => "extended",
            CapabilityLevel::Extended2 => "extended2",
        }
    }

    /// Parse a capability tier from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "base" => Some(CapabilityLevel::Base),
            "extended" => Some(CapabilityLevel::Extended),
            "extended2" => Some(CapabilityLevel::Extended2),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability tier offered by the host environment.
///
/// Consulted at call time by the adapting façades; defaults to full
/// support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostCapabilities {
    /// Highest tier the host supports.
    pub level: CapabilityLevel,
}

impl HostCapabilities {
    /// Host capabilities at a specific tier.
    pub fn new(level: CapabilityLevel) -> Self {
        Self { level }
    }

    /// A host offering only the baseline contract.
    pub fn base() -> Self {
        Self::new(CapabilityLevel::Base)
    }

    /// A host offering the first extended tier.
    pub fn extended() -> Self {
        Self::new(CapabilityLevel::Extended)
    }

    /// Whether the host supports `level`.
    pub fn supports(&self, level: CapabilityLevel) -> bool {
        self.level >= level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        assert!(CapabilityLevel::Base < CapabilityLevel::Extended);
        assert!(CapabilityLevel::Extended < CapabilityLevel::Extended2);
    }

    #[test]
    fn test_default_host_supports_everything() {
        let host = HostCapabilities::default();
        assert!(host.supports(CapabilityLevel::Base));
        assert!(host.supports(CapabilityLevel::Extended));
        assert!(host.supports(CapabilityLevel::Extended2));
    }

    #[test]
    fn test_base_host_rejects_extended_tiers() {
        let host = HostCapabilities::base();
        assert!(host.supports(CapabilityLevel::Base));
        assert!(!host.supports(CapabilityLevel::Extended));
        assert!(!host.supports(CapabilityLevel::Extended2));
    }

    #[test]
    fn test_parse_round_trip() {
        for level in [
            CapabilityLevel::Base,
            CapabilityLevel::Extended,
            CapabilityLevel::Extended2,
        ] {
            assert_eq!(CapabilityLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(CapabilityLevel::parse("unknown"), None);
    }
}
