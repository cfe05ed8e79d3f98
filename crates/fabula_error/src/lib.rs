//! Error types for the Fabula library.
//!
//! This crate provides the foundation error types used throughout the Fabula
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
//!
//! fn read_artifact() -> FabulaResult<String> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("brief.json".to_string())))?
//! }
//!
//! match read_artifact() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod compose;
mod config;
mod error;
mod json;
mod pipeline;
mod resume;
mod storage;

pub use capability::{CapabilityError, CapabilityErrorKind};
pub use compose::{ComposeError, ComposeErrorKind};
pub use config::ConfigError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use resume::{ResumeError, ResumeErrorKind};
pub use storage::{StorageError, StorageErrorKind};
