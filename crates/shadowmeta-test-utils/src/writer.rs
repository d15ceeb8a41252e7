//! Scripted writer-metadata fakes.

use crate::calls::CallLog;
use shadowmeta_provider::{
    BackupSchema, CapabilityLevel, ComponentDependency, ComponentHandle, ComponentKind,
    FileBackupMask, FileCounts, FileSpecHandle, LoadOutcome, ProviderError, ProviderResult,
    RawComponentInfo, RawExtendedIdentity, RawIdentity, RestoreMethod, StatusCode, UsageKind,
    SourceKind, WriterMetadataHandle,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A scripted file-description handle.
///
/// Clones share the same call log, so a template kept by the test keeps
/// counting after copies of it are handed out and released.
#[derive(Debug, Clone)]
pub struct FakeFileSpec {
    path: String,
    spec: String,
    recursive: bool,
    alternate_location: Option<String>,
    backup_mask: FileBackupMask,
    failures: HashMap<&'static str, StatusCode>,
    released: bool,
    log: CallLog,
}

impl FakeFileSpec {
    pub fn new(path: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            spec: spec.into(),
            recursive: false,
            alternate_location: None,
            backup_mask: FileBackupMask::default(),
            failures: HashMap::new(),
            released: false,
            log: CallLog::new(),
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_alternate_location(mut self, location: impl Into<String>) -> Self {
        self.alternate_location = Some(location.into());
        self
    }

    pub fn with_backup_mask(mut self, mask: FileBackupMask) -> Self {
        self.backup_mask = mask;
        self
    }

    /// Make `operation` fail with the given status.
    pub fn fail_on(mut self, operation: &'static str, code: StatusCode) -> Self {
        self.failures.insert(operation, code);
        self
    }

    /// The log this fake (and every clone of it) records into.
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
}

impl FileSpecHandle for FakeFileSpec {
    fn path(&self) -> ProviderResult<String> {
        self.call("path")?;
        Ok(self.path.clone())
    }

    fn spec(&self) -> ProviderResult<String> {
        self.call("spec")?;
        Ok(self.spec.clone())
    }

    fn recursive(&self) -> ProviderResult<bool> {
        self.call("recursive")?;
        Ok(self.recursive)
    }

    fn alternate_location(&self) -> ProviderResult<Option<String>> {
        self.call("alternate_location")?;
        Ok(self.alternate_location.clone())
    }

    fn backup_mask(&self) -> ProviderResult<FileBackupMask> {
        self.call("backup_mask")?;
        Ok(self.backup_mask)
    }

    fn release(&mut self) {
        self.log.record("release");
        self.released = true;
    }
}

/// A scripted component handle.
#[derive(Debug, Clone)]
pub struct FakeComponent {
    kind: ComponentKind,
    logical_path: Option<String>,
    component_name: String,
    caption: Option<String>,
    restore_metadata: bool,
    notify_on_backup_complete: bool,
    selectable: bool,
    files: Vec<FakeFileSpec>,
    database_files: Vec<FakeFileSpec>,
    log_files: Vec<FakeFileSpec>,
    dependencies: Vec<ComponentDependency>,
    failures: HashMap<&'static str, StatusCode>,
    released: bool,
    log: CallLog,
}

impl FakeComponent {
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::FileGroup,
            logical_path: None,
            component_name: component_name.into(),
            caption: None,
            restore_metadata: false,
            notify_on_backup_complete: false,
            selectable: true,
            files: Vec::new(),
            database_files: Vec::new(),
            log_files: Vec::new(),
            dependencies: Vec::new(),
            failures: HashMap::new(),
            released: false,
            log: CallLog::new(),
        }
    }

    pub fn with_kind(mut self, kind: ComponentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_logical_path(mut self, path: impl Into<String>) -> Self {
        self.logical_path = Some(path.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_file(mut self, file: FakeFileSpec) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_database_file(mut self, file: FakeFileSpec) -> Self {
        self.database_files.push(file);
        self
    }

    pub fn with_log_file(mut self, file: FakeFileSpec) -> Self {
        self.log_files.push(file);
        self
    }

    pub fn with_dependency(mut self, dependency: ComponentDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Make `operation` fail with the given status.
    pub fn fail_on(mut self, operation: &'static str, code: StatusCode) -> Self {
        self.failures.insert(operation, code);
        self
    }

    /// The log this fake (and every clone of it) records into.
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

    fn spec_at(
        &self,
        operation: &'static str,
        list: &[FakeFileSpec],
        index: u32,
    ) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.call(operation)?;
        match list.get(index as usize) {
            Some(spec) => Ok(Box::new(spec.clone())),
            None => Err(ProviderError::call_failed(
                operation,
                StatusCode::OBJECT_NOT_FOUND,
            )),
        }
    }
}

impl ComponentHandle for FakeComponent {
    fn info(&self) -> ProviderResult<RawComponentInfo> {
        self.call("info")?;
        Ok(RawComponentInfo {
            kind: self.kind,
            logical_path: self.logical_path.clone(),
            component_name: self.component_name.clone(),
            caption: self.caption.clone(),
            restore_metadata: self.restore_metadata,
            notify_on_backup_complete: self.notify_on_backup_complete,
            selectable: self.selectable,
            file_count: self.files.len() as u32,
            database_file_count: self.database_files.len() as u32,
            log_file_count: self.log_files.len() as u32,
            dependency_count: self.dependencies.len() as u32,
        })
    }

    fn file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at("file", &self.files, index)
    }

    fn database_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at("database_file", &self.database_files, index)
    }

    fn log_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at("log_file", &self.log_files, index)
    }

    fn dependency(&self, index: u32) -> ProviderResult<ComponentDependency> {
        self.call("dependency")?;
        match self.dependencies.get(index as usize) {
            Some(dependency) => Ok(dependency.clone()),
            None => Err(ProviderError::call_failed(
                "dependency",
                StatusCode::OBJECT_NOT_FOUND,
            )),
        }
    }

    fn release(&mut self) {
        self.log.record("release");
        self.released = true;
    }
}

/// A scripted writer-metadata handle.
///
/// Defaults describe a plausible user-data writer at the highest
/// capability tier; builders override any field, inject per-operation
/// failures, and script a replacement state applied by a successful
/// document load.
#[derive(Debug, Clone)]
pub struct FakeWriterMetadata {
    capability: CapabilityLevel,
    instance_id: Uuid,
    writer_id: Uuid,
    writer_name: String,
    instance_name: String,
    usage: UsageKind,
    source: SourceKind,
    include_count: u32,
    exclude_files: Vec<FakeFileSpec>,
    components: Vec<FakeComponent>,
    restore_method: Option<RestoreMethod>,
    alternate_location_mappings: Vec<FakeFileSpec>,
    version: (u32, u32),
    snapshot_exclude_files: Vec<FakeFileSpec>,
    backup_schema: BackupSchema,
    document: String,
    reload: Option<Box<FakeWriterMetadata>>,
    failures: HashMap<&'static str, StatusCode>,
    released: bool,
    log: CallLog,
}

impl Default for FakeWriterMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWriterMetadata {
    pub fn new() -> Self {
        Self {
            capability: CapabilityLevel::Extended2,
            instance_id: Uuid::new_v4(),
            writer_id: Uuid::new_v4(),
            writer_name: "Fake Writer".to_string(),
            instance_name: "Fake Writer Instance".to_string(),
            usage: UsageKind::UserData,
            source: SourceKind::NonTransactedDb,
            include_count: 0,
            exclude_files: Vec::new(),
            components: Vec::new(),
            restore_method: None,
            alternate_location_mappings: Vec::new(),
            version: (1, 0),
            snapshot_exclude_files: Vec::new(),
            backup_schema: BackupSchema::UNDEFINED,
            document: "<writer-metadata/>".to_string(),
            reload: None,
            failures: HashMap::new(),
            released: false,
            log: CallLog::new(),
        }
    }

    pub fn with_capability(mut self, capability: CapabilityLevel) -> Self {
        self.capability = capability;
        self
    }

    pub fn with_instance_id(mut self, instance_id: Uuid) -> Self {
        self.instance_id = instance_id;
        self
    }

    pub fn with_writer_id(mut self, writer_id: Uuid) -> Self {
        self.writer_id = writer_id;
        self
    }

    pub fn with_writer_name(mut self, name: impl Into<String>) -> Self {
        self.writer_name = name.into();
        self
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    pub fn with_usage(mut self, usage: UsageKind) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_include_count(mut self, count: u32) -> Self {
        self.include_count = count;
        self
    }

    pub fn with_exclude_file(mut self, file: FakeFileSpec) -> Self {
        self.exclude_files.push(file);
        self
    }

    pub fn with_component(mut self, component: FakeComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_restore_method(mut self, method: RestoreMethod) -> Self {
        self.restore_method = Some(method);
        self
    }

    pub fn with_alternate_location_mapping(mut self, file: FakeFileSpec) -> Self {
        self.alternate_location_mappings.push(file);
        self
    }

    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn with_snapshot_exclude_file(mut self, file: FakeFileSpec) -> Self {
        self.snapshot_exclude_files.push(file);
        self
    }

    pub fn with_backup_schema(mut self, schema: BackupSchema) -> Self {
        self.backup_schema = schema;
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = document.into();
        self
    }

    /// Script the state a successful document load switches to.
    pub fn with_reload(mut self, reloaded: FakeWriterMetadata) -> Self {
        self.reload = Some(Box::new(reloaded));
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

    fn raw_identity(&self) -> RawIdentity {
        RawIdentity {
            instance_id: self.instance_id,
            writer_id: self.writer_id,
            writer_name: self.writer_name.clone(),
            usage: self.usage,
            source: self.source,
        }
    }

    fn spec_at(
        &self,
        operation: &'static str,
        list: &[FakeFileSpec],
        index: u32,
    ) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.call(operation)?;
        match list.get(index as usize) {
            Some(spec) => Ok(Box::new(spec.clone())),
            None => Err(ProviderError::call_failed(
                operation,
                StatusCode::OBJECT_NOT_FOUND,
            )),
        }
    }
}

impl WriterMetadataHandle for FakeWriterMetadata {
    fn capability(&self) -> CapabilityLevel {
        self.capability
    }

    fn identity(&self) -> ProviderResult<RawIdentity> {
        self.call("identity")?;
        Ok(self.raw_identity())
    }

    fn extended_identity(&self) -> ProviderResult<RawExtendedIdentity> {
        self.call("extended_identity")?;
        Ok(RawExtendedIdentity {
            identity: self.raw_identity(),
            instance_name: self.instance_name.clone(),
        })
    }

    fn file_counts(&self) -> ProviderResult<FileCounts> {
        self.call("file_counts")?;
        Ok(FileCounts {
            include_files: self.include_count,
            exclude_files: self.exclude_files.len() as u32,
            components: self.components.len() as u32,
        })
    }

    fn exclude_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at("exclude_file", &self.exclude_files, index)
    }

    fn component(&self, index: u32) -> ProviderResult<Box<dyn ComponentHandle>> {
        self.call("component")?;
        match self.components.get(index as usize) {
            Some(component) => Ok(Box::new(component.clone())),
            None => Err(ProviderError::call_failed(
                "component",
                StatusCode::OBJECT_NOT_FOUND,
            )),
        }
    }

    fn restore_method(&self) -> ProviderResult<Option<RestoreMethod>> {
        self.call("restore_method")?;
        Ok(self.restore_method.clone())
    }

    fn alternate_location_mapping(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at(
            "alternate_location_mapping",
            &self.alternate_location_mappings,
            index,
        )
    }

    fn backup_schema(&self) -> ProviderResult<BackupSchema> {
        self.call("backup_schema")?;
        Ok(self.backup_schema)
    }

    fn version(&self) -> ProviderResult<(u32, u32)> {
        self.call("version")?;
        Ok(self.version)
    }

    fn snapshot_exclude_count(&self) -> ProviderResult<u32> {
        self.call("snapshot_exclude_count")?;
        Ok(self.snapshot_exclude_files.len() as u32)
    }

    fn snapshot_exclude_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>> {
        self.spec_at("snapshot_exclude_file", &self.snapshot_exclude_files, index)
    }

    fn load_document(&mut self, document: &str) -> ProviderResult<LoadOutcome> {
        self.call("load_document")?;
        if document.trim().is_empty() {
            return Ok(LoadOutcome::Declined);
        }
        if let Some(next) = self.reload.take() {
            let log = self.log.clone();
            *self = *next;
            self.log = log;
        }
        self.document = document.to_string();
        Ok(LoadOutcome::Applied)
    }

    fn save_document(&self) -> ProviderResult<String> {
        self.call("save_document")?;
        Ok(self.document.clone())
    }

    fn release(&mut self) {
        self.log.record("release");
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_document_is_declined() {
        let mut fake = FakeWriterMetadata::new();
        assert_eq!(fake.load_document("  \n").unwrap(), LoadOutcome::Declined);
        assert_eq!(fake.load_document("<x/>").unwrap(), LoadOutcome::Applied);
        assert_eq!(fake.save_document().unwrap(), "<x/>");
    }

    #[test]
    fn test_reload_state_is_applied_once() {
        let mut fake = FakeWriterMetadata::new()
            .with_writer_name("before")
            .with_reload(FakeWriterMetadata::new().with_writer_name("after"));
        let log = fake.call_log();

        fake.load_document("<x/>").unwrap();
        assert_eq!(fake.identity().unwrap().writer_name, "after");
        // The original log keeps counting after the swap.
        assert_eq!(log.count("load_document"), 1);
        assert_eq!(log.count("identity"), 1);
    }

    #[test]
    fn test_failure_injection() {
        let fake = FakeWriterMetadata::new().fail_on("file_counts", StatusCode::BAD_STATE);
        let err = fake.file_counts().unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::BAD_STATE));
    }

    #[test]
    fn test_calls_after_release_are_rejected() {
        let mut fake = FakeWriterMetadata::new();
        fake.release();
        assert!(matches!(
            fake.identity(),
            Err(ProviderError::UseAfterRelease { .. })
        ));
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let fake = FakeWriterMetadata::new();
        let err = fake.exclude_file(0).err().unwrap();
        assert_eq!(err.status_code(), Some(StatusCode::OBJECT_NOT_FOUND));
    }

    #[test]
    fn test_component_counts_follow_lists() {
        let component = FakeComponent::new("logs")
            .with_file(FakeFileSpec::new("C:\\logs\\", "*.log").with_recursive(true));
        let info = component.info().unwrap();
        assert_eq!(info.file_count, 1);
        assert_eq!(info.database_file_count, 0);
    }
}
