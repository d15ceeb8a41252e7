//! Provider handle contracts for shadowmeta.
//!
//! This crate defines the external boundary of the workspace: the opaque,
//! reference-counted handles a host environment supplies, and the
//! vocabulary they speak:
//! - Writer-metadata handles (identity, file lists, components, restore
//!   method, versioning)
//! - File-description and component child handles
//! - Storage-area (diff area) management handles
//! - The three-tier status model (affirmative / neutral / failure)
//! - Runtime capability tiers
//!
//! Every handle is owned by exactly one adapter, which must call
//! `release` exactly once. Consumers of enumeration results adopt each
//! child handle into an owned record and release it whether or not
//! adoption succeeds.

pub mod capability;
pub mod component;
pub mod error;
pub mod filespec;
pub mod mgmt;
pub mod status;
pub mod types;
pub mod writer;

pub use capability::{CapabilityLevel, HostCapabilities};
pub use component::{ComponentDependency, ComponentHandle, RawComponentInfo};
pub use error::{ProviderError, ProviderResult};
pub use filespec::FileSpecHandle;
pub use mgmt::{
    DiffAreaManagementHandle, DiffAreaProperties, DiffVolumeProperties, ProtectionFault,
    ProtectionLevel, VolumeProtectionInfo, MINIMUM_DIFF_AREA_SIZE,
};
pub use status::{LoadOutcome, StatusCode};
pub use types::{
    BackupSchema, ComponentKind, FileBackupMask, RestoreMethodKind, SourceKind, UsageKind,
    WriterRestoreCondition,
};
pub use writer::{FileCounts, RawExtendedIdentity, RawIdentity, RestoreMethod, WriterMetadataHandle};
