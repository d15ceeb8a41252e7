//! Writer-metadata provider contract.

use crate::capability::CapabilityLevel;
use crate::component::ComponentHandle;
use crate::error::ProviderResult;
use crate::filespec::FileSpecHandle;
use crate::status::LoadOutcome;
use crate::types::{
    BackupSchema, RestoreMethodKind, SourceKind, UsageKind, WriterRestoreCondition,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity fields available from every writer-metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIdentity {
    /// Identifier of this writer instance.
    pub instance_id: Uuid,
    /// Identifier of the writer class.
    pub writer_id: Uuid,
    /// Human-readable writer name.
    pub writer_name: String,
    /// How the writer's data is used.
    pub usage: UsageKind,
    /// Where the writer's data comes from.
    pub source: SourceKind,
}

/// Identity fields from the extended query, which adds the instance name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtendedIdentity {
    pub identity: RawIdentity,
    /// Name of this writer instance.
    pub instance_name: String,
}

/// Counts reported for the writer's file lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    pub include_files: u32,
    pub exclude_files: u32,
    pub components: u32,
}

/// How a writer's data should be restored after a snapshot is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreMethod {
    pub method: RestoreMethodKind,
    /// Service to stop and restart around the restore, if any.
    pub service: Option<String>,
    /// Manual procedure the operator must follow, if any.
    pub user_procedure: Option<String>,
    pub writer_restore: WriterRestoreCondition,
    pub reboot_required: bool,
    /// Number of alternate-location mappings the writer declares.
    pub mapping_count: u32,
}

/// Writer-metadata provider handle.
///
/// An opaque, reference-counted resource supplied by the host
/// environment. Ownership is exclusive: the adopting adapter must call
/// [`release`](WriterMetadataHandle::release) exactly once, and no other
/// entity may. Neutral outcomes ("nothing to report") are `Ok` values,
/// never errors.
pub trait WriterMetadataHandle {
    /// Capability tier this handle reports at runtime.
    fn capability(&self) -> CapabilityLevel;

    /// Base identity query.
    fn identity(&self) -> ProviderResult<RawIdentity>;

    /// Extended identity query.
    ///
    /// Only attempted when the handle reports at least
    /// [`CapabilityLevel::Extended`].
    fn extended_identity(&self) -> ProviderResult<RawExtendedIdentity>;

    /// Counts for the include/exclude/component lists.
    fn file_counts(&self) -> ProviderResult<FileCounts>;

    /// File description at `index` in the exclude list.
    fn exclude_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// Component at `index`.
    fn component(&self, index: u32) -> ProviderResult<Box<dyn ComponentHandle>>;

    /// The writer's restore method, or `None` when it declares none.
    fn restore_method(&self) -> ProviderResult<Option<RestoreMethod>>;

    /// Alternate-location mapping at `index`.
    fn alternate_location_mapping(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// Backup schemas the writer supports.
    fn backup_schema(&self) -> ProviderResult<BackupSchema>;

    /// Writer-declared metadata version as a major/minor pair.
    ///
    /// Only attempted when the handle reports
    /// [`CapabilityLevel::Extended2`].
    fn version(&self) -> ProviderResult<(u32, u32)>;

    /// Number of file descriptions excluded from snapshots.
    ///
    /// Only attempted when the handle reports
    /// [`CapabilityLevel::Extended2`].
    fn snapshot_exclude_count(&self) -> ProviderResult<u32>;

    /// Snapshot-excluded file description at `index`.
    fn snapshot_exclude_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// Replace provider state from a serialized metadata document.
    fn load_document(&mut self, document: &str) -> ProviderResult<LoadOutcome>;

    /// Serialize current provider state to a metadata document.
    fn save_document(&self) -> ProviderResult<String>;

    /// Drop the provider's reference. Must be called exactly once by the
    /// owner.
    fn release(&mut self);
}
