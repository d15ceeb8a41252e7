//! Writer components.
//!
//! A component is a handle-backed object in its own right: basic facts
//! are read eagerly at adoption, while its file lists are fetched lazily
//! and cached with the same discipline the parent view applies.

use crate::cache::CacheSlot;
use crate::error::{MetadataError, MetadataResult};
use crate::filespec::FileSpec;
use shadowmeta_provider::{
    ComponentDependency, ComponentHandle, ComponentKind, FileSpecHandle, ProviderResult,
    RawComponentInfo,
};
use tracing::debug;

/// A writer component adapted from a provider handle.
///
/// Owns its handle exclusively; [`close`](WriterComponent::close)
/// releases it exactly once, and dropping the component closes it.
pub struct WriterComponent {
    handle: Option<Box<dyn ComponentHandle>>,
    info: RawComponentInfo,
    files: CacheSlot<Vec<FileSpec>>,
    database_files: CacheSlot<Vec<FileSpec>>,
    log_files: CacheSlot<Vec<FileSpec>>,
    dependencies: CacheSlot<Vec<ComponentDependency>>,
}

impl WriterComponent {
    /// Adopt a component handle.
    ///
    /// Reads the component facts eagerly; on failure the handle is
    /// released before the error propagates.
    pub fn adopt(handle: Box<dyn ComponentHandle>) -> MetadataResult<Self> {
        let mut handle = handle;
        match handle.info() {
            Ok(info) => Ok(Self {
                handle: Some(handle),
                info,
                files: CacheSlot::default(),
                database_files: CacheSlot::default(),
                log_files: CacheSlot::default(),
                dependencies: CacheSlot::default(),
            }),
            Err(err) => {
                handle.release();
                Err(err.into())
            }
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.info.kind
    }

    pub fn logical_path(&self) -> Option<&str> {
        self.info.logical_path.as_deref()
    }

    pub fn component_name(&self) -> &str {
        &self.info.component_name
    }

    pub fn caption(&self) -> Option<&str> {
        self.info.caption.as_deref()
    }

    /// Whether the writer stores private metadata for restore.
    pub fn restore_metadata(&self) -> bool {
        self.info.restore_metadata
    }

    /// Whether the writer wants notification when backup completes.
    pub fn notify_on_backup_complete(&self) -> bool {
        self.info.notify_on_backup_complete
    }

    /// Whether the component can be selected independently for backup.
    pub fn selectable(&self) -> bool {
        self.info.selectable
    }

    /// Logical path and component name joined; unique within a writer.
    pub fn full_path(&self) -> String {
        match self.info.logical_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{path}\\{}", self.info.component_name),
            _ => self.info.component_name.clone(),
        }
    }

    /// The component's file descriptions. Fetched once and cached.
    pub fn files(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.files.is_fetched() {
            let list = fetch_file_list(self.handle()?, self.info.file_count, |h, i| h.file(i))?;
            debug!(
                "Cached {} files for component '{}'",
                list.len(),
                self.info.component_name
            );
            self.files.set(list);
        }
        Ok(self.files.fetched())
    }

    /// The component's database file descriptions. Fetched once and cached.
    pub fn database_files(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.database_files.is_fetched() {
            let list = fetch_file_list(self.handle()?, self.info.database_file_count, |h, i| {
                h.database_file(i)
            })?;
            self.database_files.set(list);
        }
        Ok(self.database_files.fetched())
    }

    /// The component's database log file descriptions. Fetched once and
    /// cached.
    pub fn database_log_files(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.log_files.is_fetched() {
            let list =
                fetch_file_list(self.handle()?, self.info.log_file_count, |h, i| h.log_file(i))?;
            self.log_files.set(list);
        }
        Ok(self.log_files.fetched())
    }

    /// Components of other writers this component depends on. Fetched
    /// once and cached.
    pub fn dependencies(&mut self) -> MetadataResult<&[ComponentDependency]> {
        if !self.dependencies.is_fetched() {
            let handle = self.handle()?;
            let mut list = Vec::with_capacity(self.info.dependency_count as usize);
            for index in 0..self.info.dependency_count {
                list.push(handle.dependency(index)?);
            }
            self.dependencies.set(list);
        }
        Ok(self.dependencies.fetched())
    }

    /// Release the underlying handle.
    ///
    /// Idempotent; cached lists remain readable, but accessors that would
    /// need the provider fail with [`MetadataError::Closed`].
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Whether the underlying handle has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    fn handle(&self) -> MetadataResult<&dyn ComponentHandle> {
        self.handle.as_deref().ok_or(MetadataError::Closed)
    }
}

impl Drop for WriterComponent {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for WriterComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterComponent")
            .field("info", &self.info)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

fn fetch_file_list(
    handle: &dyn ComponentHandle,
    count: u32,
    get: impl Fn(&dyn ComponentHandle, u32) -> ProviderResult<Box<dyn FileSpecHandle>>,
) -> MetadataResult<Vec<FileSpec>> {
    let mut list = Vec::with_capacity(count as usize);
    for index in 0..count {
        list.push(FileSpec::adopt(get(handle, index)?)?);
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowmeta_provider::StatusCode;
    use shadowmeta_test_utils::{FakeComponent, FakeFileSpec};
    use uuid::Uuid;

    #[test]
    fn test_adopt_reads_info_eagerly() {
        let fake = FakeComponent::new("default")
            .with_kind(ComponentKind::Database)
            .with_logical_path("registry")
            .with_caption("Registry hives");
        let log = fake.call_log();

        let component = WriterComponent::adopt(Box::new(fake)).unwrap();
        assert_eq!(component.kind(), ComponentKind::Database);
        assert_eq!(component.component_name(), "default");
        assert_eq!(component.caption(), Some("Registry hives"));
        assert_eq!(log.count("info"), 1);
    }

    #[test]
    fn test_adopt_failure_releases_handle() {
        let fake = FakeComponent::new("broken").fail_on("info", StatusCode::BAD_STATE);
        let log = fake.call_log();

        let err = WriterComponent::adopt(Box::new(fake)).err().unwrap();
        assert_eq!(err.status_code(), Some(StatusCode::BAD_STATE));
        assert_eq!(log.count("release"), 1);
    }

    #[test]
    fn test_full_path_joins_logical_path() {
        let with_path = WriterComponent::adopt(Box::new(
            FakeComponent::new("default").with_logical_path("registry"),
        ))
        .unwrap();
        assert_eq!(with_path.full_path(), "registry\\default");

        let without_path = WriterComponent::adopt(Box::new(FakeComponent::new("default"))).unwrap();
        assert_eq!(without_path.full_path(), "default");
    }

    #[test]
    fn test_file_lists_fetched_once_each() {
        let fake = FakeComponent::new("data")
            .with_file(FakeFileSpec::new("C:\\Data\\", "*.dat"))
            .with_database_file(FakeFileSpec::new("C:\\Data\\", "db.mdf"))
            .with_log_file(FakeFileSpec::new("C:\\Logs\\", "db.ldf"));
        let log = fake.call_log();
        let mut component = WriterComponent::adopt(Box::new(fake)).unwrap();

        assert_eq!(component.files().unwrap().len(), 1);
        assert_eq!(component.files().unwrap().len(), 1);
        assert_eq!(component.database_files().unwrap().len(), 1);
        assert_eq!(component.database_log_files().unwrap().len(), 1);

        assert_eq!(log.count("file"), 1);
        assert_eq!(log.count("database_file"), 1);
        assert_eq!(log.count("log_file"), 1);
    }

    #[test]
    fn test_dependencies_cached() {
        let dependency = ComponentDependency {
            writer_id: Uuid::new_v4(),
            logical_path: None,
            component_name: "other".to_string(),
        };
        let fake = FakeComponent::new("data").with_dependency(dependency.clone());
        let log = fake.call_log();
        let mut component = WriterComponent::adopt(Box::new(fake)).unwrap();

        {
            let deps = component.dependencies().unwrap();
            assert_eq!(deps.len(), 1);
            assert_eq!(deps[0], dependency);
        }
        component.dependencies().unwrap();
        assert_eq!(log.count("dependency"), 1);
    }

    #[test]
    fn test_close_releases_exactly_once() {
        let fake = FakeComponent::new("data");
        let log = fake.call_log();
        let mut component = WriterComponent::adopt(Box::new(fake)).unwrap();

        component.close();
        component.close();
        assert!(component.is_closed());
        assert_eq!(log.count("release"), 1);

        drop(component);
        assert_eq!(log.count("release"), 1);
    }

    #[test]
    fn test_closed_component_keeps_eager_facts() {
        let fake = FakeComponent::new("data").with_file(FakeFileSpec::new("C:\\Data\\", "*.dat"));
        let mut component = WriterComponent::adopt(Box::new(fake)).unwrap();
        component.close();

        assert_eq!(component.component_name(), "data");
        assert!(matches!(component.files(), Err(MetadataError::Closed)));
    }
}
