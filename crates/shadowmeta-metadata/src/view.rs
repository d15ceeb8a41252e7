//! Caching view over a writer-metadata provider handle.

use crate::cache::CacheSlot;
use crate::component::WriterComponent;
use crate::error::{MetadataError, MetadataResult};
use crate::filespec::FileSpec;
use crate::identity::WriterIdentity;
use crate::version::WriterVersion;
use shadowmeta_provider::{
    BackupSchema, CapabilityLevel, HostCapabilities, LoadOutcome, RestoreMethod, SourceKind,
    UsageKind, WriterMetadataHandle,
};
use tracing::{debug, info};
use uuid::Uuid;

/// A caching view over a writer-metadata provider handle.
///
/// Identity fields are captured eagerly when the view adopts its handle.
/// Every collection is fetched lazily, converted into owned values, and
/// cached for the lifetime of the view; a populated cache is never
/// re-queried until [`load_xml`](WriterMetadataView::load_xml) replaces
/// the underlying document.
///
/// The view owns its handle exclusively and releases it exactly once,
/// either via [`close`](WriterMetadataView::close) or on drop. Lazy
/// accessors take `&mut self`, so first-population races cannot occur
/// without external synchronization.
pub struct WriterMetadataView {
    handle: Option<Box<dyn WriterMetadataHandle>>,
    host: HostCapabilities,
    identity: WriterIdentity,
    exclude_files: CacheSlot<Vec<FileSpec>>,
    components: CacheSlot<Vec<WriterComponent>>,
    restore_method: CacheSlot<Option<RestoreMethod>>,
    alternate_location_mappings: CacheSlot<Vec<FileSpec>>,
    version: CacheSlot<WriterVersion>,
    snapshot_exclude_files: CacheSlot<Vec<FileSpec>>,
}

impl WriterMetadataView {
    /// Adopt a provider handle, taking exclusive ownership of it.
    ///
    /// Identity is read eagerly: the extended query when both the host
    /// and the handle support the [`CapabilityLevel::Extended`] tier,
    /// the base query otherwise. If initialization fails the handle is
    /// released before the error propagates, so adoption is
    /// all-or-nothing.
    pub fn adopt(
        handle: Box<dyn WriterMetadataHandle>,
        host: HostCapabilities,
    ) -> MetadataResult<Self> {
        let mut handle = handle;
        match Self::read_identity(handle.as_ref(), host) {
            Ok(identity) => {
                debug!(
                    "Adopted metadata for writer '{}' ({})",
                    identity.writer_name, identity.writer_id
                );
                Ok(Self {
                    handle: Some(handle),
                    host,
                    identity,
                    exclude_files: CacheSlot::default(),
                    components: CacheSlot::default(),
                    restore_method: CacheSlot::default(),
                    alternate_location_mappings: CacheSlot::default(),
                    version: CacheSlot::default(),
                    snapshot_exclude_files: CacheSlot::default(),
                })
            }
            Err(err) => {
                handle.release();
                Err(err)
            }
        }
    }

    /// The writer's full identity.
    pub fn identity(&self) -> &WriterIdentity {
        &self.identity
    }

    /// Identifier of this writer instance.
    pub fn instance_id(&self) -> Uuid {
        self.identity.instance_id
    }

    /// Identifier of the writer class.
    pub fn writer_id(&self) -> Uuid {
        self.identity.writer_id
    }

    pub fn writer_name(&self) -> &str {
        &self.identity.writer_name
    }

    /// Instance name; empty when only the base identity query is
    /// available.
    pub fn instance_name(&self) -> &str {
        &self.identity.instance_name
    }

    pub fn usage(&self) -> UsageKind {
        self.identity.usage
    }

    pub fn source(&self) -> SourceKind {
        self.identity.source
    }

    /// Replace provider state from a serialized metadata document.
    ///
    /// Returns `true` when the provider applied the document; all caches
    /// are cleared and identity is re-derived, since cached data may now
    /// be stale. Returns `false` when the provider declined it, leaving
    /// every cache and identity field untouched. A provider failure
    /// surfaces as an error and leaves the view usable.
    pub fn load_xml(&mut self, document: &str) -> MetadataResult<bool> {
        let outcome = self.handle_mut()?.load_document(document)?;
        match outcome {
            LoadOutcome::Declined => {
                debug!("Provider declined metadata document");
                Ok(false)
            }
            LoadOutcome::Applied => {
                self.initialize()?;
                info!(
                    "Reloaded metadata for writer '{}' from document",
                    self.identity.writer_name
                );
                Ok(true)
            }
        }
    }

    /// Serialize current provider state to a metadata document.
    pub fn save_xml(&self) -> MetadataResult<String> {
        Ok(self.handle()?.save_document()?)
    }

    /// File descriptions the writer excludes from backup. Fetched once
    /// and cached.
    pub fn exclude_files(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.exclude_files.is_fetched() {
            let handle = self.handle()?;
            let counts = handle.file_counts()?;
            let mut list = Vec::with_capacity(counts.exclude_files as usize);
            for index in 0..counts.exclude_files {
                list.push(FileSpec::adopt(handle.exclude_file(index)?)?);
            }
            debug!(
                "Cached {} exclude files for writer '{}'",
                list.len(),
                self.identity.writer_name
            );
            self.exclude_files.set(list);
        }
        Ok(self.exclude_files.fetched())
    }

    /// The writer's components. Fetched once and cached; each component
    /// owns its own handle and lazy structure.
    pub fn components(&mut self) -> MetadataResult<&mut [WriterComponent]> {
        if !self.components.is_fetched() {
            let handle = self.handle()?;
            let counts = handle.file_counts()?;
            let mut list = Vec::with_capacity(counts.components as usize);
            for index in 0..counts.components {
                list.push(WriterComponent::adopt(handle.component(index)?)?);
            }
            debug!(
                "Cached {} components for writer '{}'",
                list.len(),
                self.identity.writer_name
            );
            self.components.set(list);
        }
        Ok(self.components.fetched_mut())
    }

    /// How the writer's data should be restored, or `None` when the
    /// writer declares no restore method. Both outcomes are cached; an
    /// absent method is not re-queried on later calls.
    pub fn restore_method(&mut self) -> MetadataResult<Option<&RestoreMethod>> {
        if !self.restore_method.is_fetched() {
            let method = self.handle()?.restore_method()?;
            self.restore_method.set(method);
        }
        Ok(self.restore_method.fetched().as_ref())
    }

    /// Alternate-location mappings declared by the restore method.
    ///
    /// Empty when the writer declares no restore method; in that case no
    /// mapping fetch is issued to the provider.
    pub fn alternate_location_mappings(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.alternate_location_mappings.is_fetched() {
            let mapping_count = match self.restore_method()? {
                Some(method) => method.mapping_count,
                None => 0,
            };
            let mut list = Vec::with_capacity(mapping_count as usize);
            for index in 0..mapping_count {
                let handle = self.handle()?;
                list.push(FileSpec::adopt(handle.alternate_location_mapping(index)?)?);
            }
            self.alternate_location_mappings.set(list);
        }
        Ok(self.alternate_location_mappings.fetched())
    }

    /// Backup schemas the writer supports.
    ///
    /// Not cached. Requires the [`CapabilityLevel::Extended`] tier on
    /// the host; below it the call fails fast without touching the
    /// provider.
    pub fn backup_schema(&self) -> MetadataResult<BackupSchema> {
        if !self.host.supports(CapabilityLevel::Extended) {
            return Err(MetadataError::unsupported(
                "backup_schema",
                CapabilityLevel::Extended,
            ));
        }
        Ok(self.handle()?.backup_schema()?)
    }

    /// Writer-declared metadata version. Fetched once and cached;
    /// `0.0` when the [`CapabilityLevel::Extended2`] tier is
    /// unavailable.
    pub fn version(&mut self) -> MetadataResult<WriterVersion> {
        if !self.version.is_fetched() {
            let version = if self.extended2_available()? {
                let (major, minor) = self.handle()?.version()?;
                WriterVersion::new(major, minor)
            } else {
                WriterVersion::default()
            };
            self.version.set(version);
        }
        Ok(*self.version.fetched())
    }

    /// File descriptions the writer excludes from snapshots. Fetched
    /// once and cached; empty when the [`CapabilityLevel::Extended2`]
    /// tier is unavailable.
    pub fn snapshot_exclude_files(&mut self) -> MetadataResult<&[FileSpec]> {
        if !self.snapshot_exclude_files.is_fetched() {
            let list = if self.extended2_available()? {
                let handle = self.handle()?;
                let count = handle.snapshot_exclude_count()?;
                let mut list = Vec::with_capacity(count as usize);
                for index in 0..count {
                    list.push(FileSpec::adopt(handle.snapshot_exclude_file(index)?)?);
                }
                list
            } else {
                Vec::new()
            };
            self.snapshot_exclude_files.set(list);
        }
        Ok(self.snapshot_exclude_files.fetched())
    }

    /// Release the underlying handle.
    ///
    /// Idempotent: a second call is a no-op, and dropping the view after
    /// an explicit close releases nothing further. Cached collections
    /// remain readable; accessors that would need the provider fail with
    /// [`MetadataError::Closed`].
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            debug!(
                "Released metadata handle for writer '{}'",
                self.identity.writer_name
            );
            handle.release();
        }
    }

    /// Whether the underlying handle has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Re-derive identity and reset every cache. The reload path after a
    /// successful document load.
    fn initialize(&mut self) -> MetadataResult<()> {
        self.identity = Self::read_identity(self.handle()?, self.host)?;
        self.exclude_files.clear();
        self.components.clear();
        self.restore_method.clear();
        self.alternate_location_mappings.clear();
        self.version.clear();
        self.snapshot_exclude_files.clear();
        Ok(())
    }

    fn read_identity(
        handle: &dyn WriterMetadataHandle,
        host: HostCapabilities,
    ) -> MetadataResult<WriterIdentity> {
        if host.supports(CapabilityLevel::Extended)
            && handle.capability() >= CapabilityLevel::Extended
        {
            Ok(WriterIdentity::from_extended(handle.extended_identity()?))
        } else {
            Ok(WriterIdentity::from_base(handle.identity()?))
        }
    }

    /// Whether the versioning/snapshot-exclusion tier is available from
    /// both the host and the handle.
    fn extended2_available(&self) -> MetadataResult<bool> {
        Ok(self.host.supports(CapabilityLevel::Extended2)
            && self.handle()?.capability() >= CapabilityLevel::Extended2)
    }

    fn handle(&self) -> MetadataResult<&dyn WriterMetadataHandle> {
        self.handle.as_deref().ok_or(MetadataError::Closed)
    }

    fn handle_mut(&mut self) -> MetadataResult<&mut dyn WriterMetadataHandle> {
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(MetadataError::Closed),
        }
    }
}

impl Drop for WriterMetadataView {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for WriterMetadataView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterMetadataView")
            .field("identity", &self.identity)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
