//! Fabula - Staged Picture-Book Generation
//!
//! Fabula turns a short story idea into an illustrated picture book through a
//! linear pipeline of generation stages: requirements extraction, plot,
//! prose, visual direction, and page rendering. Every stage transition and
//! every completed page is persisted as a JSON artifact in the story's
//! folder, so an interrupted run resumes exactly where it stopped.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{FileSystemStore, Pipeline, PipelineOptions, StoryWithPlot};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     fabula::init_observability()?;
//!
//!     let model = MyStoryModel::new()?; // your StoryModel implementation
//!     let pipeline = Pipeline::new(model);
//!
//!     let store = Arc::new(FileSystemStore::create_for_title(
//!         "stories",
//!         "The Fog Lighthouse",
//!     )?);
//!     let options = PipelineOptions::default().with_store(store.clone());
//!
//!     let story: StoryWithPlot = plan_story()?; // brief + plot
//!     let outcome = pipeline.run(story, &options).await?;
//!     println!("Rendered {} pages", outcome.book().unwrap().pages.len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Fabula is organized as a workspace with focused crates:
//!
//! - `fabula_error` - Error types
//! - `fabula_core` - The story data model, stage machine, and progress events
//! - `fabula_interface` - The `StoryModel` capability trait and its
//!   rate-limiting and validation wrappers
//! - `fabula_storage` - Artifact persistence per story folder
//! - `fabula_pipeline` - The orchestrator, page accumulator, and resume
//!   detection
//!
//! This crate (`fabula`) re-exports everything for convenience and carries
//! the logging initialization.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::*;
pub use fabula_pipeline::*;
pub use fabula_storage::*;
pub use observability::{
    init_observability, init_observability_with_config, load_env, ObservabilityConfig,
};
