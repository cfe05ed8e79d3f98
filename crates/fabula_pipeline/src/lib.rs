//! Pipeline orchestration for the Fabula book generator.
//!
//! This crate drives a plotted story through the remaining stages (prose,
//! visual direction, rendering), one page at a time, persisting a checkpoint
//! after every stage transition and every completed page. A crashed or
//! cancelled run resumes from its story folder without redoing any completed
//! work.
//!
//! - [`accumulate`] is the per-page fold shared by every page-oriented stage.
//! - [`Pipeline`] is the stage state machine.
//! - [`detect_stage`] and [`load_pipeline_state`] map a story folder back to
//!   the point the pipeline should re-enter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accumulator;
mod orchestrator;
mod resume;
mod state;

pub use accumulator::{accumulate, NullPageSink, PageGenerator, PageSink};
pub use orchestrator::{Pipeline, PipelineOptions, PipelineOutcome, StopAfter};
pub use resume::{detect_stage, load_pipeline_state, ResumePoint, ResumeStage};
pub use state::PartialComposedState;
