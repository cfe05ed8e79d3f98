//! Narrative skeleton produced by plot generation.

use serde::{Deserialize, Serialize};

/// Fewest beats a plot may have.
pub const MIN_PLOT_BEATS: usize = 4;
/// Most beats a plot may have.
pub const MAX_PLOT_BEATS: usize = 6;

/// Narrative purpose of a beat.
///
/// The classic five-part taxonomy plus the extended falling-action and
/// denouement tags some plot models emit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BeatPurpose {
    /// Introduce the world and cast
    Setup,
    /// The central problem appears
    Conflict,
    /// Stakes escalate
    RisingAction,
    /// The decisive moment
    Climax,
    /// Consequences unwind
    FallingAction,
    /// The problem is settled
    Resolution,
    /// Final emotional landing
    Denouement,
}

/// One beat of the narrative skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotBeat {
    /// What this beat does for the story
    pub purpose: BeatPurpose,
    /// One-sentence description
    pub description: String,
}

/// The narrative skeleton for a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStructure {
    /// One-paragraph arc summary
    pub summary: String,
    /// Ordered beats, 4-6 of them
    pub beats: Vec<PlotBeat>,
}
