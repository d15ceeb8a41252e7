//! Owned file descriptions.

use crate::error::MetadataResult;
use serde::{Deserialize, Serialize};
use shadowmeta_provider::{FileBackupMask, FileSpecHandle};

/// An owned file description, converted from a provider handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Root path of the described file set.
    pub path: String,
    /// File specification, possibly containing wildcards.
    pub spec: String,
    /// Whether subdirectories of the path are included.
    pub recursive: bool,
    /// Alternate location the files may be restored to, if any.
    pub alternate_location: Option<String>,
    /// Backup and snapshot requirements for the described files.
    pub backup_mask: FileBackupMask,
}

impl FileSpec {
    /// Adopt a file-description handle into an owned record.
    ///
    /// The handle is released whether or not reading succeeds.
    pub fn adopt(mut handle: Box<dyn FileSpecHandle>) -> MetadataResult<Self> {
        let spec = Self::read(handle.as_ref());
        handle.release();
        spec
    }

    fn read(handle: &dyn FileSpecHandle) -> MetadataResult<Self> {
        Ok(Self {
            path: handle.path()?,
            spec: handle.spec()?,
            recursive: handle.recursive()?,
            alternate_location: handle.alternate_location()?,
            backup_mask: handle.backup_mask()?,
        })
    }
}
