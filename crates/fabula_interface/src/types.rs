//! Request types for per-page generation capabilities.

use fabula_core::{
    BookFormat, ComposedStory, IllustratedPage, ProsePage, ProseSetup, StoryWithPlot,
    StoryWithProse, VisualStyleGuide,
};

/// Input to per-page prose generation.
///
/// `prior_pages` holds the completed pages 1..N-1 in order; this is what
/// carries narrative continuity from page to page.
#[derive(Debug, Clone, Copy)]
pub struct ProsePageRequest<'a> {
    /// The plotted story
    pub story: &'a StoryWithPlot,
    /// Story-wide voice
    pub prose_setup: &'a ProseSetup,
    /// 1-based page to generate
    pub page_number: u32,
    /// Completed pages 1..N-1 in order
    pub prior_pages: &'a [ProsePage],
}

/// Input to per-page visual beat generation.
#[derive(Debug, Clone, Copy)]
pub struct VisualBeatsRequest<'a> {
    /// The story with prose
    pub story: &'a StoryWithProse,
    /// Global illustration style
    pub style_guide: &'a VisualStyleGuide,
    /// 1-based page to illustrate
    pub page_number: u32,
    /// The prose page being illustrated
    pub prose_page: &'a ProsePage,
    /// Completed illustrated pages 1..N-1 in order
    pub prior_pages: &'a [IllustratedPage],
}

/// Input to per-page rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderPageRequest<'a> {
    /// The full composed story
    pub composed_story: &'a ComposedStory,
    /// 1-based page to render
    pub page_number: u32,
    /// Physical format to render for
    pub format: BookFormat,
}
