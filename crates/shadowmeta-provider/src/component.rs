//! Component provider contract.

use crate::error::ProviderResult;
use crate::filespec::FileSpecHandle;
use crate::types::ComponentKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Facts a component handle reports eagerly at adoption time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComponentInfo {
    pub kind: ComponentKind,
    /// Logical grouping path, if the writer declares one.
    pub logical_path: Option<String>,
    pub component_name: String,
    /// Display caption, if any.
    pub caption: Option<String>,
    /// Whether the writer stores private metadata for restore.
    pub restore_metadata: bool,
    /// Whether the writer wants notification when backup completes.
    pub notify_on_backup_complete: bool,
    /// Whether the component can be selected independently for backup.
    pub selectable: bool,
    pub file_count: u32,
    pub database_file_count: u32,
    pub log_file_count: u32,
    pub dependency_count: u32,
}

/// A component's declared dependency on another writer's component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDependency {
    /// Writer class that owns the depended-on component.
    pub writer_id: Uuid,
    pub logical_path: Option<String>,
    pub component_name: String,
}

/// Component handle.
///
/// Obtained from the component enumeration on a writer-metadata handle.
/// Adopted into an owned component object with the same
/// release-exactly-once discipline as its parent.
pub trait ComponentHandle {
    /// Eager component facts, including counts for the lazy lists.
    fn info(&self) -> ProviderResult<RawComponentInfo>;

    /// File description at `index` in the component's file list.
    fn file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// File description at `index` in the database-file list.
    fn database_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// File description at `index` in the database-log-file list.
    fn log_file(&self, index: u32) -> ProviderResult<Box<dyn FileSpecHandle>>;

    /// Dependency declaration at `index`.
    fn dependency(&self, index: u32) -> ProviderResult<ComponentDependency>;

    /// Drop the provider's reference. Must be called exactly once by the
    /// owner.
    fn release(&mut self);
}
