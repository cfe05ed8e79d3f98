//! The user's initial requirements for a book.

use fabula_error::{ConfigError, FabulaResult};
use serde::{Deserialize, Serialize};

/// Smallest page count a book may have.
pub const MIN_PAGE_COUNT: u32 = 8;
/// Largest page count a book may have.
pub const MAX_PAGE_COUNT: u32 = 32;

/// Target reader age range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    /// Youngest target reader age
    pub min: u8,
    /// Oldest target reader age
    pub max: u8,
}

impl AgeRange {
    /// Create an age range; `min` must not exceed `max`.
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// A character in the cast list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character name, used as the id in character placements
    pub name: String,
    /// One-sentence description
    pub description: String,
}

/// The user's initial requirements, extracted from their raw story idea.
///
/// # Examples
///
/// ```
/// use fabula_core::{AgeRange, Brief, Character};
///
/// let brief = Brief::builder()
///     .title("The Fog Lighthouse")
///     .arc("A timid firefly learns her small light matters")
///     .setting("A foggy harbor town")
///     .age_range(AgeRange::new(4, 7))
///     .page_count(12u32)
///     .characters(vec![Character {
///         name: "Fen".to_string(),
///         description: "A timid firefly".to_string(),
///     }])
///     .build()
///     .unwrap();
///
/// assert_eq!(brief.page_count, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Brief {
    /// Working title of the book
    pub title: String,
    /// One-sentence core narrative arc
    pub arc: String,
    /// Primary setting
    pub setting: String,
    /// Target reader age range
    pub age_range: AgeRange,
    /// Number of pages to generate
    pub page_count: u32,
    /// Cast list; at least one character
    pub characters: Vec<Character>,
    /// Optional tone guidance (e.g. "gentle", "silly")
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Optional moral or takeaway
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moral: Option<String>,
    /// Optional reader interests to weave in
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl Brief {
    /// Start building a brief.
    pub fn builder() -> BriefBuilder {
        BriefBuilder::default()
    }
}

/// A partially extracted brief.
///
/// Requirements extraction is iterative: each pass over the user's raw text
/// may fill in only some fields. Drafts merge, with earlier values winning,
/// until [`BriefDraft::finish`] produces a complete [`Brief`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BriefDraft {
    /// Working title, if extracted
    pub title: Option<String>,
    /// Core arc, if extracted
    pub arc: Option<String>,
    /// Setting, if extracted
    pub setting: Option<String>,
    /// Age range, if extracted
    pub age_range: Option<AgeRange>,
    /// Page count, if extracted
    pub page_count: Option<u32>,
    /// Cast list gathered so far
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Optional tone
    pub tone: Option<String>,
    /// Optional moral
    pub moral: Option<String>,
    /// Optional interests
    pub interests: Option<Vec<String>>,
}

impl BriefDraft {
    /// Merge another draft into this one.
    ///
    /// Existing scalar fields win; `other` only fills gaps. Characters are
    /// appended, deduplicated by name.
    pub fn merge(&mut self, other: BriefDraft) {
        self.title = self.title.take().or(other.title);
        self.arc = self.arc.take().or(other.arc);
        self.setting = self.setting.take().or(other.setting);
        self.age_range = self.age_range.take().or(other.age_range);
        self.page_count = self.page_count.take().or(other.page_count);
        self.tone = self.tone.take().or(other.tone);
        self.moral = self.moral.take().or(other.moral);
        self.interests = self.interests.take().or(other.interests);

        for character in other.characters {
            if !self.characters.iter().any(|c| c.name == character.name) {
                self.characters.push(character);
            }
        }
    }

    /// True when every required field has been extracted.
    pub fn is_complete(&self) -> bool {
        self.title.is_some()
            && self.arc.is_some()
            && self.setting.is_some()
            && self.age_range.is_some()
            && self.page_count.is_some()
            && !self.characters.is_empty()
    }

    /// Convert into a complete [`Brief`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing required field.
    pub fn finish(self) -> FabulaResult<Brief> {
        let missing = |field: &str| ConfigError::new(format!("Brief is missing '{}'", field));

        Ok(Brief {
            title: self.title.ok_or_else(|| missing("title"))?,
            arc: self.arc.ok_or_else(|| missing("arc"))?,
            setting: self.setting.ok_or_else(|| missing("setting"))?,
            age_range: self.age_range.ok_or_else(|| missing("age_range"))?,
            page_count: self.page_count.ok_or_else(|| missing("page_count"))?,
            characters: if self.characters.is_empty() {
                return Err(missing("characters").into());
            } else {
                self.characters
            },
            tone: self.tone,
            moral: self.moral,
            interests: self.interests,
        })
    }
}
