//! File-description provider contract.

use crate::error::ProviderResult;
use crate::types::FileBackupMask;

/// File-description handle.
///
/// Obtained from enumeration calls on writer-metadata and component
/// handles. The consumer adopts it into an owned record and must release
/// it whether or not adoption succeeds.
pub trait FileSpecHandle {
    /// Root path of the described file set.
    fn path(&self) -> ProviderResult<String>;

    /// File specification, possibly containing wildcards.
    fn spec(&self) -> ProviderResult<String>;

    /// Whether subdirectories of the path are included.
    fn recursive(&self) -> ProviderResult<bool>;

    /// Alternate location the files may be restored to, if any.
    fn alternate_location(&self) -> ProviderResult<Option<String>>;

    /// Backup and snapshot requirements for the described files.
    fn backup_mask(&self) -> ProviderResult<FileBackupMask>;

    /// Drop the provider's reference. Must be called exactly once by the
    /// owner.
    fn release(&mut self);
}
