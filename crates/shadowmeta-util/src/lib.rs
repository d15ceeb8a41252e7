//! Shared utilities for shadowmeta.
//!
//! This crate provides common infrastructure used across the shadowmeta
//! workspace:
//! - Logging setup with tracing
//!
//! # Example
//!
//! ```
//! use shadowmeta_util::{log, LogConfig, LogLevel};
//!
//! log::init(LogConfig {
//!     print: false,
//!     level: LogLevel::Debug,
//!     include_location: false,
//! });
//! ```

pub mod log;

pub use log::{LogConfig, LogLevel};
