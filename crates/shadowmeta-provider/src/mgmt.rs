//! Storage-area management contract.
//!
//! Covers shadow-copy storage-area ("diff area") associations between a
//! source volume and the volume hosting its copy-on-write storage, plus
//! volume protection control on the highest capability tier.

use crate::capability::CapabilityLevel;
use crate::error::ProviderResult;
use crate::status::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum size of a shadow-copy storage area, in bytes.
pub const MINIMUM_DIFF_AREA_SIZE: i64 = 300 * 1024 * 1024;

/// A storage-area association and its space accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffAreaProperties {
    /// Volume whose snapshots the storage area serves.
    pub volume_name: String,
    /// Volume hosting the storage area.
    pub diff_area_volume_name: String,
    pub maximum_diff_space: i64,
    pub allocated_diff_space: i64,
    pub used_diff_space: i64,
}

/// A volume eligible to host storage areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffVolumeProperties {
    pub volume_name: String,
    pub volume_display_name: String,
    pub volume_free_space: i64,
    pub volume_total_space: i64,
}

/// Protection level applied to a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProtectionLevel {
    /// Favor the original volume: discard snapshots on storage pressure.
    #[default]
    OriginalVolume,
    /// Favor snapshots: take the volume offline rather than discard.
    Snapshot,
}

/// Fault recorded against a protected volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProtectionFault {
    #[default]
    None,
    DiffAreaMissing,
    IoFailureDuringOnline,
    MetadataCorruption,
    MemoryAllocationFailure,
    MappedMemoryFailure,
    CowReadFailure,
    CowWriteFailure,
    DiffAreaFull,
    GrowTooSlow,
    GrowFailed,
    DestroyAllSnapshots,
    FileSystemFailure,
    IoFailure,
    DiffAreaRemoved,
    ExternalWriterToDiffArea,
}

/// Protection state of a volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeProtectionInfo {
    pub protection_level: ProtectionLevel,
    pub volume_is_offline_for_protection: bool,
    pub protection_fault: ProtectionFault,
    /// Status recorded with the fault; zero when no fault is present.
    pub failure_status: StatusCode,
    pub volume_has_unused_diff_area: bool,
}

/// Storage-area management handle.
///
/// Same ownership discipline as the writer-metadata handle: exactly one
/// owner, released exactly once. Operations beyond the base tier are
/// only attempted when the handle reports the matching capability.
pub trait DiffAreaManagementHandle {
    /// Capability tier this handle reports at runtime.
    fn capability(&self) -> CapabilityLevel;

    /// Associate a storage area on `diff_area_volume_name` with
    /// `volume_name`.
    fn add_diff_area(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> ProviderResult<()>;

    /// Update the maximum size of an existing association.
    fn change_diff_area_maximum_size(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> ProviderResult<()>;

    /// Update the maximum size, optionally without persisting across
    /// restarts. Requires [`CapabilityLevel::Extended`].
    fn change_diff_area_maximum_size_volatile(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
        is_volatile: bool,
    ) -> ProviderResult<()>;

    /// Storage areas in use by the given snapshot.
    fn query_diff_areas_for_snapshot(
        &self,
        snapshot_id: Uuid,
    ) -> ProviderResult<Vec<DiffAreaProperties>>;

    /// Storage areas in use by the given source volume.
    fn query_diff_areas_for_volume(
        &self,
        volume_name: &str,
    ) -> ProviderResult<Vec<DiffAreaProperties>>;

    /// Storage areas physically located on the given volume.
    fn query_diff_areas_on_volume(
        &self,
        volume_name: &str,
    ) -> ProviderResult<Vec<DiffAreaProperties>>;

    /// Volumes that can host a storage area for `original_volume_name`.
    fn query_volumes_supported_for_diff_areas(
        &self,
        original_volume_name: &str,
    ) -> ProviderResult<Vec<DiffVolumeProperties>>;

    /// Clear a recorded protection fault. Requires
    /// [`CapabilityLevel::Extended2`].
    fn clear_volume_protect_fault(&mut self, volume_name: &str) -> ProviderResult<()>;

    /// Delete storage areas on the given volume that no snapshot uses.
    /// Requires [`CapabilityLevel::Extended2`].
    fn delete_unused_diff_areas(&mut self, diff_area_volume_name: &str) -> ProviderResult<()>;

    /// Protection state of a volume. Requires
    /// [`CapabilityLevel::Extended2`].
    fn volume_protection_level(
        &self,
        volume_name: &str,
    ) -> ProviderResult<VolumeProtectionInfo>;

    /// Set the protection level of a volume. Requires
    /// [`CapabilityLevel::Extended2`].
    fn set_volume_protection_level(
        &mut self,
        volume_name: &str,
        level: ProtectionLevel,
    ) -> ProviderResult<()>;

    /// Drop the provider's reference. Must be called exactly once by the
    /// owner.
    fn release(&mut self);
}
