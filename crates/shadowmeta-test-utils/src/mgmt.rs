//! Scripted storage-area management fakes.

use crate::calls::CallLog;
use shadowmeta_provider::{
    CapabilityLevel, DiffAreaManagementHandle, DiffAreaProperties, DiffVolumeProperties,
    ProtectionFault, ProtectionLevel, ProviderError, ProviderResult, StatusCode,
    VolumeProtectionInfo,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A scripted storage-area management handle.
///
/// Associations, supported volumes, and per-volume protection state are
/// held in memory; mutating operations update them so tests can assert
/// on the resulting state through the query operations.
#[derive(Debug, Clone)]
pub struct FakeDiffAreaManagement {
    capability: CapabilityLevel,
    associations: Vec<DiffAreaProperties>,
    snapshot_diff_areas: HashMap<Uuid, Vec<DiffAreaProperties>>,
    supported_volumes: Vec<DiffVolumeProperties>,
    protection: HashMap<String, VolumeProtectionInfo>,
    max_associations: Option<usize>,
    failures: HashMap<&'static str, StatusCode>,
    released: bool,
    log: CallLog,
}

impl Default for FakeDiffAreaManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDiffAreaManagement {
    pub fn new() -> Self {
        Self {
            capability: CapabilityLevel::Extended2,
            associations: Vec::new(),
            snapshot_diff_areas: HashMap::new(),
            supported_volumes: Vec::new(),
            protection: HashMap::new(),
            max_associations: None,
            failures: HashMap::new(),
            released: false,
            log: CallLog::new(),
        }
    }

    pub fn with_capability(mut self, capability: CapabilityLevel) -> Self {
        self.capability = capability;
        self
    }

    pub fn with_association(mut self, association: DiffAreaProperties) -> Self {
        self.associations.push(association);
        self
    }

    pub fn with_snapshot_diff_area(mut self, snapshot_id: Uuid, area: DiffAreaProperties) -> Self {
        self.snapshot_diff_areas
            .entry(snapshot_id)
            .or_default()
            .push(area);
        self
    }

    pub fn with_supported_volume(mut self, volume: DiffVolumeProperties) -> Self {
        self.supported_volumes.push(volume);
        self
    }

    pub fn with_protection(mut self, volume_name: impl Into<String>, info: VolumeProtectionInfo) -> Self {
        self.protection.insert(volume_name.into(), info);
        self
    }

    /// Reject further associations beyond `max`.
    pub fn with_max_associations(mut self, max: usize) -> Self {
        self.max_associations = Some(max);
        self
    }

    /// Make `operation` fail with the given status.
    pub fn fail_on(mut self, operation: &'static str, code: StatusCode) -> Self {
        self.failures.insert(operation, code);
        self
    }

    /// The log this fake records into.
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    fn call(&self, operation: &'static str) -> ProviderResult<()> {
        self.log.record(operation);
        if self.released {
            return Err(ProviderError::UseAfterRelease { operation });
        }
        if let Some(code) = self.failures.get(operation) {
            return Err(ProviderError::call_failed(operation, *code));
        }
        Ok(())
    }

    fn association_mut(
        &mut self,
        operation: &'static str,
        volume_name: &str,
        diff_area_volume_name: &str,
    ) -> ProviderResult<&mut DiffAreaProperties> {
        self.associations
            .iter_mut()
            .find(|a| a.volume_name == volume_name && a.diff_area_volume_name == diff_area_volume_name)
            .ok_or(ProviderError::CallFailed {
                operation,
                code: StatusCode::OBJECT_NOT_FOUND,
            })
    }
}

impl DiffAreaManagementHandle for FakeDiffAreaManagement {
    fn capability(&self) -> CapabilityLevel {
        self.capability
    }

    fn add_diff_area(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> ProviderResult<()> {
        self.call("add_diff_area")?;
        if let Some(max) = self.max_associations {
            if self.associations.len() >= max {
                return Err(ProviderError::call_failed(
                    "add_diff_area",
                    StatusCode::MAXIMUM_DIFF_AREA_ASSOCIATIONS_REACHED,
                ));
            }
        }
        let duplicate = self.associations.iter().any(|a| {
            a.volume_name == volume_name && a.diff_area_volume_name == diff_area_volume_name
        });
        if duplicate {
            return Err(ProviderError::call_failed(
                "add_diff_area",
                StatusCode::BAD_STATE,
            ));
        }
        self.associations.push(DiffAreaProperties {
            volume_name: volume_name.to_string(),
            diff_area_volume_name: diff_area_volume_name.to_string(),
            maximum_diff_space,
            allocated_diff_space: 0,
            used_diff_space: 0,
        });
        Ok(())
    }

    fn change_diff_area_maximum_size(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
    ) -> ProviderResult<()> {
        self.call("change_diff_area_maximum_size")?;
        let association = self.association_mut(
            "change_diff_area_maximum_size",
            volume_name,
            diff_area_volume_name,
        )?;
        association.maximum_diff_space = maximum_diff_space;
        Ok(())
    }

    fn change_diff_area_maximum_size_volatile(
        &mut self,
        volume_name: &str,
        diff_area_volume_name: &str,
        maximum_diff_space: i64,
        _is_volatile: bool,
    ) -> ProviderResult<()> {
        self.call("change_diff_area_maximum_size_volatile")?;
        let association = self.association_mut(
            "change_diff_area_maximum_size_volatile",
            volume_name,
            diff_area_volume_name,
        )?;
        association.maximum_diff_space = maximum_diff_space;
        Ok(())
    }

    fn query_diff_areas_for_snapshot(
        &self,
        snapshot_id: Uuid,
    ) -> ProviderResult<Vec<DiffAreaProperties>> {
        self.call("query_diff_areas_for_snapshot")?;
        Ok(self
            .snapshot_diff_areas
            .get(&snapshot_id)
            .cloned()
            .unwrap_or_default())
    }

    fn query_diff_areas_for_volume(
        &self,
        volume_name: &str,
    ) -> ProviderResult<Vec<DiffAreaProperties>> {
        self.call("query_diff_areas_for_volume")?;
        Ok(self
            .associations
            .iter()
            .filter(|a| a.volume_name == volume_name)
            .cloned()
            .collect())
    }

    fn query_diff_areas_on_volume(
        &self,
        volume_name: &str,
    ) -> ProviderResult<Vec<DiffAreaProperties>> {
        self.call("query_diff_areas_on_volume")?;
        Ok(self
            .associations
            .iter()
            .filter(|a| a.diff_area_volume_name == volume_name)
            .cloned()
            .collect())
    }

    fn query_volumes_supported_for_diff_areas(
        &self,
        _original_volume_name: &str,
    ) -> ProviderResult<Vec<DiffVolumeProperties>> {
        self.call("query_volumes_supported_for_diff_areas")?;
        Ok(self.supported_volumes.clone())
    }

    fn clear_volume_protect_fault(&mut self, volume_name: &str) -> ProviderResult<()> {
        self.call("clear_volume_protect_fault")?;
        match self.protection.get_mut(volume_name) {
            Some(info) => {
                info.protection_fault = ProtectionFault::None;
                info.failure_status = StatusCode(0);
                info.volume_is_offline_for_protection = false;
                Ok(())
            }
            None => Err(ProviderError::call_failed(
                "clear_volume_protect_fault",
                StatusCode::OBJECT_NOT_FOUND,
            )),
        }
    }

    fn delete_unused_diff_areas(&mut self, diff_area_volume_name: &str) -> ProviderResult<()> {
        self.call("delete_unused_diff_areas")?;
        self.associations.retain(|a| {
            a.diff_area_volume_name != diff_area_volume_name || a.used_diff_space != 0
        });
        Ok(())
    }

    fn volume_protection_level(
        &self,
        volume_name: &str,
    ) -> ProviderResult<VolumeProtectionInfo> {
        self.call("volume_protection_level")?;
        self.protection
            .get(volume_name)
            .cloned()
            .ok_or(ProviderError::CallFailed {
                operation: "volume_protection_level",
                code: StatusCode::OBJECT_NOT_FOUND,
            })
    }

    fn set_volume_protection_level(
        &mut self,
        volume_name: &str,
        level: ProtectionLevel,
    ) -> ProviderResult<()> {
        self.call("set_volume_protection_level")?;
        let info = self
            .protection
            .entry(volume_name.to_string())
            .or_insert(VolumeProtectionInfo {
                protection_level: ProtectionLevel::OriginalVolume,
                volume_is_offline_for_protection: false,
                protection_fault: ProtectionFault::None,
                failure_status: StatusCode(0),
                volume_has_unused_diff_area: false,
            });
        info.protection_level = level;
        Ok(())
    }

    fn release(&mut self) {
        self.log.record("release");
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn association(volume: &str, diff_volume: &str, used: i64) -> DiffAreaProperties {
        DiffAreaProperties {
            volume_name: volume.to_string(),
            diff_area_volume_name: diff_volume.to_string(),
            maximum_diff_space: 400 * 1024 * 1024,
            allocated_diff_space: used,
            used_diff_space: used,
        }
    }

    #[test]
    fn test_add_then_query_by_volume() {
        let mut fake = FakeDiffAreaManagement::new();
        fake.add_diff_area("C:\\", "D:\\", 400 * 1024 * 1024).unwrap();

        let areas = fake.query_diff_areas_for_volume("C:\\").unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].diff_area_volume_name, "D:\\");
        assert!(fake.query_diff_areas_for_volume("E:\\").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_association_is_rejected() {
        let mut fake =
            FakeDiffAreaManagement::new().with_association(association("C:\\", "D:\\", 0));
        let err = fake.add_diff_area("C:\\", "D:\\", 400 * 1024 * 1024).unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::BAD_STATE));
    }

    #[test]
    fn test_association_limit() {
        let mut fake = FakeDiffAreaManagement::new()
            .with_max_associations(1)
            .with_association(association("C:\\", "D:\\", 0));
        let err = fake.add_diff_area("E:\\", "D:\\", 400 * 1024 * 1024).unwrap_err();
        assert_eq!(
            err.status_code(),
            Some(StatusCode::MAXIMUM_DIFF_AREA_ASSOCIATIONS_REACHED)
        );
    }

    #[test]
    fn test_delete_unused_keeps_in_use_areas() {
        let mut fake = FakeDiffAreaManagement::new()
            .with_association(association("C:\\", "D:\\", 0))
            .with_association(association("E:\\", "D:\\", 1024));

        fake.delete_unused_diff_areas("D:\\").unwrap();
        let remaining = fake.query_diff_areas_on_volume("D:\\").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].volume_name, "E:\\");
    }

    #[test]
    fn test_protection_round_trip() {
        let mut fake = FakeDiffAreaManagement::new();
        fake.set_volume_protection_level("C:\\", ProtectionLevel::Snapshot)
            .unwrap();
        let info = fake.volume_protection_level("C:\\").unwrap();
        assert_eq!(info.protection_level, ProtectionLevel::Snapshot);
    }
}
