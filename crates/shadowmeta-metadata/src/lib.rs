//! Writer-metadata examination for shadowmeta.
//!
//! This crate adapts opaque writer-metadata provider handles into owned,
//! cached views:
//! - Eager identity capture with extended/base query selection
//! - Lazily-fetched, cached collections (exclude files, components,
//!   restore method, alternate-location mappings, version, snapshot
//!   exclusions)
//! - Document load/save with cache invalidation on reload
//! - Exactly-once handle release, explicit or on drop
//!
//! # Example
//!
//! ```
//! use shadowmeta_metadata::WriterMetadataView;
//! use shadowmeta_provider::HostCapabilities;
//! use shadowmeta_test_utils::FakeWriterMetadata;
//!
//! # fn main() -> Result<(), shadowmeta_metadata::MetadataError> {
//! let fake = FakeWriterMetadata::new().with_writer_name("Registry Writer");
//! let mut view = WriterMetadataView::adopt(Box::new(fake), HostCapabilities::default())?;
//!
//! assert_eq!(view.writer_name(), "Registry Writer");
//! assert!(view.exclude_files()?.is_empty());
//! view.close();
//! # Ok(())
//! # }
//! ```

mod cache;
mod component;
mod error;
mod filespec;
mod identity;
mod version;
mod view;

pub use component::WriterComponent;
pub use error::{MetadataError, MetadataResult};
pub use filespec::FileSpec;
pub use identity::WriterIdentity;
pub use version::WriterVersion;
pub use view::WriterMetadataView;
