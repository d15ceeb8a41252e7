//! Shadow-copy storage-area management for shadowmeta.
//!
//! This crate adapts opaque storage-area management handles into a
//! typed facade:
//! - Storage-area association, resizing, and queries
//! - Volume protection control on the highest capability tier
//! - Fail-fast capability gating and local size validation
//! - Exactly-once handle release, explicit or on drop
//!
//! # Example
//!
//! ```
//! use shadowmeta_mgmt::DiffAreaManager;
//! use shadowmeta_provider::HostCapabilities;
//! use shadowmeta_test_utils::FakeDiffAreaManagement;
//!
//! # fn main() -> Result<(), shadowmeta_mgmt::MgmtError> {
//! let fake = FakeDiffAreaManagement::new();
//! let mut manager = DiffAreaManager::adopt(Box::new(fake), HostCapabilities::default());
//!
//! manager.add_diff_area("C:\\", "D:\\", 512 * 1024 * 1024)?;
//! assert_eq!(manager.query_diff_areas_for_volume("C:\\")?.len(), 1);
//! manager.close();
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;

pub use error::{MgmtError, MgmtResult};
pub use manager::DiffAreaManager;
