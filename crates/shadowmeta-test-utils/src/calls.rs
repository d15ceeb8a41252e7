//! Call logs shared between fakes and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared per-operation call counters.
///
/// A fake and its test hold clones of the same log, so counts stay
/// observable after the fake has been boxed and adopted. Operations are
/// keyed by the contract method name (`"identity"`, `"release"`, ...).
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl CallLog {
    /// Create a new, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call of `operation`.
    pub fn record(&self, operation: &'static str) {
        let mut counts = self.inner.lock().unwrap();
        *counts.entry(operation).or_insert(0) += 1;
    }

    /// Number of recorded calls of `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.inner.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    /// Total recorded calls across all operations.
    pub fn total(&self) -> usize {
        self.inner.lock().unwrap().values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_operation() {
        let log = CallLog::new();
        log.record("identity");
        log.record("identity");
        log.record("release");

        assert_eq!(log.count("identity"), 2);
        assert_eq!(log.count("release"), 1);
        assert_eq!(log.count("version"), 0);
        assert_eq!(log.total(), 3);
    }

    #[test]
    fn test_clones_share_counts() {
        let log = CallLog::new();
        let clone = log.clone();
        clone.record("file_counts");
        assert_eq!(log.count("file_counts"), 1);
    }
}
