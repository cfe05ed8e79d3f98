//! Visual direction: the global style guide and per-page illustration beats.
//!
//! The pipeline passes style, lighting, and shot-composition detail through
//! unmodified; fields with no pipeline semantics are kept as raw JSON.

use crate::BeatPurpose;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Global art direction for the whole book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtDirection {
    /// Illustration genre (e.g. "storybook watercolor")
    pub genre: String,
    /// Medium (e.g. "gouache", "digital")
    pub medium: String,
    /// Optional technique notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
}

/// Default setting details applied to every page unless overridden per beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDefaults {
    /// Primary location
    pub location: String,
    /// Optional default time of day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Optional default weather
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

/// Global illustration style for a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualStyleGuide {
    /// Art direction
    pub art_direction: ArtDirection,
    /// Setting defaults
    pub setting: SettingDefaults,
    /// Optional lighting description, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Value>,
    /// Optional color palette, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Value>,
    /// Optional overall mood
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Optional atmosphere notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
}

/// How prominently a character features in a beat.
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
pub enum FocusTier {
    /// The beat is about this character
    Primary,
    /// Present and active, not the focus
    Secondary,
    /// Background presence
    Background,
}

/// Placement of one character within a beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPlacement {
    /// Character name, matching the brief's cast list
    pub character: String,
    /// Facial expression
    pub expression: String,
    /// Body pose
    pub pose: String,
    /// Prominence within the frame
    pub focus: FocusTier,
}

/// Camera distance for a shot.
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
pub enum ShotSize {
    /// Scene-setting wide view
    Establishing,
    /// Wide shot
    Wide,
    /// Medium shot
    Medium,
    /// Close-up
    CloseUp,
    /// Extreme close-up
    ExtremeCloseUp,
}

/// Camera angle for a shot.
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
pub enum ShotAngle {
    /// Straight-on, at character eye level
    EyeLevel,
    /// Looking down
    High,
    /// Looking up
    Low,
    /// Directly overhead
    Overhead,
    /// Tilted horizon
    Dutch,
}

/// Shot composition for a beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotComposition {
    /// Camera distance
    pub size: ShotSize,
    /// Camera angle
    pub angle: ShotAngle,
    /// Optional composition overrides, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Value>,
}

/// One visual unit within a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustrationBeat {
    /// 1-based position within the page
    pub order: u32,
    /// Narrative purpose of this beat
    pub purpose: BeatPurpose,
    /// What the beat shows
    pub summary: String,
    /// Dominant emotion
    pub emotion: String,
    /// Character placements within the frame
    pub characters: Vec<CharacterPlacement>,
    /// Shot composition
    pub shot: ShotComposition,
    /// Optional per-beat setting override, passed through unmodified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting_override: Option<Value>,
}

/// Illustration beats for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustratedPage {
    /// 1-based page number
    pub page_number: u32,
    /// Ordered beats for this page
    pub beats: Vec<IllustrationBeat>,
}

/// Complete visual direction: global style plus per-page beats.
///
/// Checkpointed with fewer pages than `page_count` while the visuals stage
/// is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDirection {
    /// Global illustration style
    pub style_guide: VisualStyleGuide,
    /// Ordered illustrated pages, 1-based and contiguous
    pub illustrated_pages: Vec<IllustratedPage>,
}

impl VisualDirection {
    /// True once all `page_count` pages are present.
    pub fn is_complete(&self, page_count: u32) -> bool {
        self.illustrated_pages.len() as u32 == page_count
    }
}
