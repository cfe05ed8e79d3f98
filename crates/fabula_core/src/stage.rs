//! The pipeline stage state machine.

use serde::{Deserialize, Serialize};

/// One stage of the generation pipeline.
///
/// Transitions are strictly linear:
///
/// ```text
/// brief --(plot generation)--> plot
/// plot --(style guide + prose setup, then per-page prose)--> prose
/// prose --(per-page visual beats)--> visuals
/// visuals --(per-page render)--> book
/// ```
///
/// `Book` is terminal: a story with a complete book artifact is done.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Requirements captured, no plot yet
    Brief,
    /// Plot structure generated
    Plot,
    /// Prose complete
    Prose,
    /// Visual direction complete
    Visuals,
    /// Book rendered; terminal
    Book,
}

impl Stage {
    /// The stage that follows this one, or `None` at the terminal stage.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Brief => Some(Stage::Plot),
            Stage::Plot => Some(Stage::Prose),
            Stage::Prose => Some(Stage::Visuals),
            Stage::Visuals => Some(Stage::Book),
            Stage::Book => None,
        }
    }

    /// True for the terminal stage.
    pub fn is_terminal(self) -> bool {
        self == Stage::Book
    }
}
