//! Story-wide voice and per-page prose.

use serde::{Deserialize, Serialize};

/// Story-wide voice established before any page is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProseSetup {
    /// One-sentence hook for the whole book
    pub logline: String,
    /// The theme the prose should carry
    pub theme: String,
    /// Optional style notes (register, rhythm, vocabulary level)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_notes: Option<String>,
}

/// The text of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProsePage {
    /// 1-based page number
    pub page_number: u32,
    /// What happens on this page, for threading into later pages
    pub summary: String,
    /// The final prose text
    pub text: String,
    /// A one-line concept for this page's illustration
    pub image_concept: String,
}

/// Complete prose for a book: setup plus ordered pages.
///
/// While the prose stage is in flight this record is checkpointed with fewer
/// pages than the brief's `page_count`; it is complete once the lengths match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prose {
    /// Story-wide voice
    pub setup: ProseSetup,
    /// Ordered pages, 1-based and contiguous
    pub pages: Vec<ProsePage>,
}

impl Prose {
    /// True once all `page_count` pages are present.
    pub fn is_complete(&self, page_count: u32) -> bool {
        self.pages.len() as u32 == page_count
    }
}
