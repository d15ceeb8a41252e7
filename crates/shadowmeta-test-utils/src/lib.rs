//! Testing utilities and scripted fakes for shadowmeta.
//!
//! This crate provides common testing infrastructure used across the
//! shadowmeta workspace:
//!
//! - **CallLog**: shared per-operation call counters for verifying cache
//!   behavior and release discipline
//! - **FakeWriterMetadata / FakeComponent / FakeFileSpec**: scripted
//!   writer-metadata handles with failure injection and reload states
//! - **FakeDiffAreaManagement**: scripted storage-area management state
//!
//! # Example
//!
//! ```
//! use shadowmeta_test_utils::FakeWriterMetadata;
//!
//! let fake = FakeWriterMetadata::new().with_writer_name("SqlServerWriter");
//! let log = fake.call_log();
//!
//! // ... adopt `fake` into a view and exercise it ...
//!
//! assert_eq!(log.count("release"), 0);
//! ```

pub mod calls;
pub mod mgmt;
pub mod writer;

pub use calls::CallLog;
pub use mgmt::FakeDiffAreaManagement;
pub use writer::{FakeComponent, FakeFileSpec, FakeWriterMetadata};
