//! The final rendered book.

use crate::AgeRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Physical format of the rendered book.
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
pub enum BookFormat {
    /// Square pages
    Square,
    /// Wide pages
    Landscape,
    /// Tall pages
    Portrait,
}

/// Where a rendered page image lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    /// Hosted image URL
    Url(String),
    /// Path on the local filesystem
    LocalPath(PathBuf),
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRef::Url(url) => write!(f, "{}", url),
            ImageRef::LocalPath(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One rendered page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 1-based page number
    pub page_number: u32,
    /// Resolved image reference
    pub image: ImageRef,
}

/// The final output of the pipeline.
///
/// Checkpointed with fewer pages than the brief's `page_count` while the
/// render stage is in flight; `created_at` is set when rendering starts and
/// is stable across checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedBook {
    /// Book title, from the brief
    pub title: String,
    /// Target reader age range, from the brief
    pub age_range: AgeRange,
    /// Chosen physical format
    pub format: BookFormat,
    /// Ordered rendered pages, 1-based and contiguous
    pub pages: Vec<RenderedPage>,
    /// When rendering of this book began
    pub created_at: DateTime<Utc>,
}

impl RenderedBook {
    /// True once all `page_count` pages are present.
    pub fn is_complete(&self, page_count: u32) -> bool {
        self.pages.len() as u32 == page_count
    }
}
