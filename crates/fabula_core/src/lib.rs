//! Core data types for the Fabula book generation pipeline.
//!
//! This crate provides the story data model used across all Fabula crates:
//! the linear composition chain from a user's [`Brief`] through plot, prose,
//! and visual direction to a [`RenderedBook`], plus the stage state machine,
//! progress event surface, and pipeline configuration.
//!
//! # The composition chain
//!
//! Each generation stage adds exactly one new field to the composed record:
//!
//! ```text
//! Brief ⊕ PlotStructure   → StoryWithPlot
//! StoryWithPlot ⊕ Prose   → StoryWithProse
//! StoryWithProse ⊕ VisualDirection → ComposedStory
//! ```
//!
//! Stages never mutate earlier fields; a composed record is immutable once a
//! later stage is appended.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod brief;
mod compose;
mod config;
mod plot;
mod progress;
mod prose;
mod stage;
mod story;
mod validate;
mod visuals;

pub use book::{BookFormat, ImageRef, RenderedBook, RenderedPage};
pub use brief::{AgeRange, Brief, BriefBuilder, BriefDraft, Character, MAX_PAGE_COUNT, MIN_PAGE_COUNT};
pub use compose::compose_value;
pub use config::{ModelConfig, PipelineConfig};
pub use plot::{BeatPurpose, PlotBeat, PlotStructure, MAX_PLOT_BEATS, MIN_PLOT_BEATS};
pub use progress::{
    ChannelSink, NullSink, ProgressEvent, ProgressSink, ProgressStatus, ProgressStep, TracingSink,
};
pub use prose::{Prose, ProsePage, ProseSetup};
pub use stage::Stage;
pub use story::{ComposedStory, StoryArtifact, StoryWithPlot, StoryWithProse};
pub use validate::Validate;
pub use visuals::{
    ArtDirection, CharacterPlacement, FocusTier, IllustratedPage, IllustrationBeat,
    SettingDefaults, ShotAngle, ShotComposition, ShotSize, VisualDirection, VisualStyleGuide,
};
