//! Storage-area management facade.

use crate::error::{MgmtError, MgmtResult};
use shadowmeta_provider::{
    CapabilityLevel, DiffAreaManagementHandle, DiffAreaProperties, DiffVolumeProperties,
    HostCapabilities, ProtectionLevel, ProviderError, StatusCode, VolumeProtectionInfo,
    MINIMUM_DIFF_AREA_SIZE,
};
use tracing::info;
use uuid::Uuid;

/// A facade over a storage-area management handle.
///
/// Queries pass straight through and return live provider state;
/// nothing is cached. Operations beyond the base tier are gated on both the
/// host's and the handle's reported capability and fail fast with an
/// unsupported error below the required tier, without touching the
/// provider.
///
/// The manager owns its handle exclusively and releases it exactly once,
/// either via [`close`](DiffAreaManager::close) or on drop.
pub struct DiffAreaManager {
    handle: Option<Box<dyn DiffAreaManagementHandle>>,
    host: HostCapabilities,
}

impl DiffAreaManager {
    /// Adopt a management handle, taking exclusive ownership of it.
    pub fn adopt(handle: Box<dyn DiffAreaManagementHandle>, host: HostCapabilities) -> Self {
        Self {
            handle: Some(handle),
            host,
        }
    }

    /// Associate a storage area on `diff_area_volume_name` with
    /// `volume_name`.
    ///
    /// `maximum_diff_space` must be at least [`MINIMUM_DIFF_AREA_SIZE`];
    /// a negative value means no limit. Undersized requests are rejected
    /// before the provider is called.
    pub fn add_diff_area(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> MgmtResult<()> {
        require_minimum_size("add_diff_area", maximum_diff_space)?;
        self.handle_mut()?
            .add_diff_area(volume_name, diff_area_volume_name, maximum_diff_space)?;
        info!(
            "Associated storage area on '{}' with volume '{}'",
            diff_area_volume_name, volume_name
        );
        Ok(())
    }

    /// Update the maximum size of an existing association.
    pub fn change_diff_area_maximum_size(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> MgmtResult<()> {
        require_minimum_size("change_diff_area_maximum_size", maximum_diff_space)?;
        self.handle_mut()?.change_diff_area_maximum_size(
            volume_name,
            diff_area_volume_name,
            maximum_diff_space,
        )?;
        Ok(())
    }

    /// Update the maximum size, optionally without persisting across
    /// restarts. Requires the [`CapabilityLevel::Extended`] tier.
    pub fn change_diff_area_maximum_size_volatile(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
        is_volatile: bool,
    ) -> MgmtResult<()> {
        self.require_tier(
            "change_diff_area_maximum_size_volatile",
            CapabilityLevel::Extended,
        )?;
        require_minimum_size("change_diff_area_maximum_size_volatile", maximum_diff_space)?;
        self.handle_mut()?.change_diff_area_maximum_size_volatile(
            volume_name,
            diff_area_volume_name,
            maximum_diff_space,
            is_volatile,
        )?;
        Ok(())
    }

    /// Storage areas in use by the given snapshot.
    pub fn query_diff_areas_for_snapshot(
        &self,
        snapshot_id: Uuid,
    ) -> MgmtResult<Vec<DiffAreaProperties>> {
        Ok(self.handle()?.query_diff_areas_for_snapshot(snapshot_id)?)
    }

    /// Storage areas in use by the given source volume.
    pub fn query_diff_areas_for_volume(
        &self,
        volume_name: &str,
    ) -> MgmtResult<Vec<DiffAreaProperties>> {
        Ok(self.handle()?.query_diff_areas_for_volume(volume_name)?)
    }

    /// Storage areas physically located on the given volume.
    pub fn query_diff_areas_on_volume(
        &self,
        volume_name: &str,
    ) -> MgmtResult<Vec<DiffAreaProperties>> {
        Ok(self.handle()?.query_diff_areas_on_volume(volume_name)?)
    }

    /// Volumes that can host a storage area for `original_volume_name`.
    pub fn query_volumes_supported_for_diff_areas(
        &self,
        original_volume_name: &str,
    ) -> MgmtResult<Vec<DiffVolumeProperties>> {
        Ok(self
            .handle()?
            .query_volumes_supported_for_diff_areas(original_volume_name)?)
    }

    /// Clear a recorded protection fault. Requires the
    /// [`CapabilityLevel::Extended2`] tier.
    pub fn clear_volume_protect_fault(&mut self, volume_name: &str) -> MgmtResult<()> {
        self.require_tier("clear_volume_protect_fault", CapabilityLevel::Extended2)?;
        Ok(self.handle_mut()?.clear_volume_protect_fault(volume_name)?)
    }

    /// Delete storage areas on the given volume that no snapshot uses.
    /// Requires the [`CapabilityLevel::Extended2`] tier.
    pub fn delete_unused_diff_areas(&mut self, diff_area_volume_name: &str) -> MgmtResult<()> {
        self.require_tier("delete_unused_diff_areas", CapabilityLevel::Extended2)?;
        self.handle_mut()?
            .delete_unused_diff_areas(diff_area_volume_name)?;
        info!(
            "Deleted unused storage areas on volume '{}'",
            diff_area_volume_name
        );
        Ok(())
    }

    /// Protection state of a volume. Requires the
    /// [`CapabilityLevel::Extended2`] tier.
    pub fn volume_protection_level(
        &self,
        volume_name: &str,
    ) -> MgmtResult<VolumeProtectionInfo> {
        self.require_tier("volume_protection_level", CapabilityLevel::Extended2)?;
        Ok(self.handle()?.volume_protection_level(volume_name)?)
    }

    /// Set the protection level of a volume. Requires the
    /// [`CapabilityLevel::Extended2`] tier.
    pub fn set_volume_protection_level(
        &mut self,
        volume_name: &str,
        level: ProtectionLevel,
    ) -> MgmtResult<()> {
        self.require_tier("set_volume_protection_level", CapabilityLevel::Extended2)?;
        self.handle_mut()?
            .set_volume_protection_level(volume_name, level)?;
        Ok(())
    }

    /// Release the underlying handle.
    ///
    /// Idempotent: a second call is a no-op, and dropping the manager
    /// after an explicit close releases nothing further.
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Whether the underlying handle has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Fail fast when the host or the handle is below `required`.
    fn require_tier(
        &self,
        operation: &'static str,
        required: CapabilityLevel,
    ) -> MgmtResult<()> {
        if !self.host.supports(required) || self.handle()?.capability() < required {
            return Err(MgmtError::unsupported(operation, required));
        }
        Ok(())
    }

    fn handle(&self) -> MgmtResult<&dyn DiffAreaManagementHandle> {
        self.handle.as_deref().ok_or(MgmtError::Closed)
    }

    fn handle_mut(&mut self) -> MgmtResult<&mut dyn DiffAreaManagementHandle> {
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(MgmtError::Closed),
        }
    }
}

impl Drop for DiffAreaManager {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DiffAreaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffAreaManager")
            .field("host", &self.host)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Reject sizes below the storage-area floor before calling the
/// provider. Negative values mean "no limit" and pass through.
fn require_minimum_size(operation: &'static str, maximum_diff_space: i64) -> MgmtResult<()> {
    if maximum_diff_space >= 0 && maximum_diff_space < MINIMUM_DIFF_AREA_SIZE {
        return Err(ProviderError::call_failed(operation, StatusCode::INVALID_ARGUMENT).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowmeta_test_utils::FakeDiffAreaManagement;

    const HALF_GIB: i64 = 512 * 1024 * 1024;

    fn manager(fake: FakeDiffAreaManagement, host: HostCapabilities) -> (DiffAreaManager, shadowmeta_test_utils::CallLog) {
        let log = fake.call_log();
        (DiffAreaManager::adopt(Box::new(fake), host), log)
    }

    #[test]
    fn test_add_and_query_round_trip() {
        let (mut mgr, _log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        mgr.add_diff_area("C:\\", "D:\\", HALF_GIB).unwrap();
        let areas = mgr.query_diff_areas_for_volume("C:\\").unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].maximum_diff_space, HALF_GIB);
    }

    #[test]
    fn test_undersized_request_never_reaches_provider() {
        let (mut mgr, log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        let err = mgr.add_diff_area("C:\\", "D:\\", 1024).unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::INVALID_ARGUMENT));
        assert_eq!(log.count("add_diff_area"), 0);
    }

    #[test]
    fn test_unlimited_size_passes_through() {
        let (mut mgr, log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        mgr.add_diff_area("C:\\", "D:\\", -1).unwrap();
        assert_eq!(log.count("add_diff_area"), 1);
    }

    #[test]
    fn test_volatile_resize_requires_extended_host() {
        let (mut mgr, log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::base());

        let err = mgr
            .change_diff_area_maximum_size_volatile("C:\\", "D:\\", HALF_GIB, true)
            .unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(log.count("change_diff_area_maximum_size_volatile"), 0);
    }

    #[test]
    fn test_volatile_resize_requires_extended_handle() {
        let fake = FakeDiffAreaManagement::new().with_capability(CapabilityLevel::Base);
        let (mut mgr, log) = manager(fake, HostCapabilities::default());

        let err = mgr
            .change_diff_area_maximum_size_volatile("C:\\", "D:\\", HALF_GIB, true)
            .unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(log.count("change_diff_area_maximum_size_volatile"), 0);
    }

    #[test]
    fn test_protection_ops_gated_below_extended2() {
        let fake = FakeDiffAreaManagement::new().with_capability(CapabilityLevel::Extended);
        let (mut mgr, log) = manager(fake, HostCapabilities::default());

        assert!(mgr
            .set_volume_protection_level("C:\\", ProtectionLevel::Snapshot)
            .unwrap_err()
            .is_unsupported());
        assert!(mgr.volume_protection_level("C:\\").unwrap_err().is_unsupported());
        assert!(mgr.clear_volume_protect_fault("C:\\").unwrap_err().is_unsupported());
        assert!(mgr.delete_unused_diff_areas("D:\\").unwrap_err().is_unsupported());
        assert_eq!(log.count("set_volume_protection_level"), 0);
        assert_eq!(log.count("volume_protection_level"), 0);
    }

    #[test]
    fn test_snapshot_and_supported_volume_queries() {
        let snapshot_id = Uuid::new_v4();
        let fake = FakeDiffAreaManagement::new()
            .with_snapshot_diff_area(
                snapshot_id,
                DiffAreaProperties {
                    volume_name: "C:\\".to_string(),
                    diff_area_volume_name: "D:\\".to_string(),
                    maximum_diff_space: HALF_GIB,
                    allocated_diff_space: 1024,
                    used_diff_space: 512,
                },
            )
            .with_supported_volume(DiffVolumeProperties {
                volume_name: "D:\\".to_string(),
                volume_display_name: "Data".to_string(),
                volume_free_space: 10 * HALF_GIB,
                volume_total_space: 20 * HALF_GIB,
            });
        let (mgr, _log) = manager(fake, HostCapabilities::default());

        let areas = mgr.query_diff_areas_for_snapshot(snapshot_id).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].used_diff_space, 512);
        assert!(mgr
            .query_diff_areas_for_snapshot(Uuid::new_v4())
            .unwrap()
            .is_empty());

        let volumes = mgr.query_volumes_supported_for_diff_areas("C:\\").unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].volume_display_name, "Data");
    }

    #[test]
    fn test_protection_round_trip_at_full_tier() {
        let (mut mgr, _log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        mgr.set_volume_protection_level("C:\\", ProtectionLevel::Snapshot)
            .unwrap();
        let info = mgr.volume_protection_level("C:\\").unwrap();
        assert_eq!(info.protection_level, ProtectionLevel::Snapshot);
    }

    #[test]
    fn test_missing_association_surfaces_status() {
        let (mut mgr, _log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        let err = mgr
            .change_diff_area_maximum_size("C:\\", "D:\\", HALF_GIB)
            .unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::OBJECT_NOT_FOUND));
    }

    #[test]
    fn test_close_releases_exactly_once() {
        let (mut mgr, log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());

        mgr.close();
        mgr.close();
        assert!(mgr.is_closed());
        assert_eq!(log.count("release"), 1);

        drop(mgr);
        assert_eq!(log.count("release"), 1);
    }

    #[test]
    fn test_closed_manager_reports_closed() {
        let (mut mgr, _log) = manager(FakeDiffAreaManagement::new(), HostCapabilities::default());
        mgr.close();

        assert!(matches!(
            mgr.query_diff_areas_for_volume("C:\\"),
            Err(MgmtError::Closed)
        ));
    }

    #[test]
    fn test_drop_releases_once() {
        let fake = FakeDiffAreaManagement::new();
        let log = fake.call_log();
        {
            let _mgr = DiffAreaManager::adopt(Box::new(fake), HostCapabilities::default());
        }
        assert_eq!(log.count("release"), 1);
    }
}
