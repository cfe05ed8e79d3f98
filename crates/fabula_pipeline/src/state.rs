//! Reconstructed mid-pipeline state.

use chrono::{DateTime, Utc};
use fabula_core::{
    ComposedStory, IllustratedPage, Prose, ProsePage, ProseSetup, RenderedPage, StoryWithPlot,
    StoryWithProse, VisualDirection, VisualStyleGuide,
};
use fabula_error::{ComposeError, ComposeErrorKind, FabulaResult};

/// As much of a composed story as persisted artifacts allow, plus per-page
/// progress within whatever stage was in flight.
///
/// The orchestrator re-enters from this state without redoing any completed
/// stage or page. A fresh run is just [`PartialComposedState::new`] with
/// everything beyond brief and plot empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialComposedState {
    /// Brief and plot, always present
    pub story: StoryWithPlot,
    /// Story-wide voice, once the prose stage has started
    pub prose_setup: Option<ProseSetup>,
    /// Completed prose pages, possibly fewer than `page_count`
    pub prose_pages: Vec<ProsePage>,
    /// Global illustration style, once persisted inside a composed story
    pub style_guide: Option<VisualStyleGuide>,
    /// Completed illustrated pages, possibly fewer than `page_count`
    pub illustrated_pages: Vec<IllustratedPage>,
    /// Completed rendered pages, possibly fewer than `page_count`
    pub rendered_pages: Vec<RenderedPage>,
    /// When rendering began, carried over from a partial book checkpoint
    pub render_started_at: Option<DateTime<Utc>>,
}

impl PartialComposedState {
    /// Fresh state: brief and plot only.
    pub fn new(story: StoryWithPlot) -> Self {
        Self {
            story,
            prose_setup: None,
            prose_pages: Vec::new(),
            style_guide: None,
            illustrated_pages: Vec::new(),
            rendered_pages: Vec::new(),
            render_started_at: None,
        }
    }

    /// Number of pages the finished book will have.
    pub fn page_count(&self) -> u32 {
        self.story.page_count()
    }

    /// Attach a persisted prose record.
    ///
    /// # Errors
    ///
    /// Fails with a field collision if any prose is already attached. Stages
    /// add exactly one field each; two sources of prose is a contract
    /// violation, never a silent overwrite.
    pub fn attach_prose(&mut self, prose: Prose) -> FabulaResult<()> {
        if self.prose_setup.is_some() || !self.prose_pages.is_empty() {
            return Err(ComposeError::new(ComposeErrorKind::FieldCollision(
                "prose".to_string(),
            ))
            .into());
        }
        self.prose_setup = Some(prose.setup);
        self.prose_pages = prose.pages;
        Ok(())
    }

    /// Attach a persisted visual direction (style guide plus any completed
    /// illustrated pages).
    ///
    /// # Errors
    ///
    /// Fails with a field collision if visuals are already attached.
    pub fn attach_visuals(&mut self, visuals: VisualDirection) -> FabulaResult<()> {
        if self.style_guide.is_some() || !self.illustrated_pages.is_empty() {
            return Err(ComposeError::new(ComposeErrorKind::FieldCollision(
                "visuals".to_string(),
            ))
            .into());
        }
        self.style_guide = Some(visuals.style_guide);
        self.illustrated_pages = visuals.illustrated_pages;
        Ok(())
    }

    /// True once every prose page is present.
    pub fn prose_complete(&self) -> bool {
        self.prose_setup.is_some() && self.prose_pages.len() as u32 == self.page_count()
    }

    /// True once every illustrated page is present.
    pub fn visuals_complete(&self) -> bool {
        self.style_guide.is_some() && self.illustrated_pages.len() as u32 == self.page_count()
    }

    /// True once every rendered page is present.
    pub fn render_complete(&self) -> bool {
        self.rendered_pages.len() as u32 == self.page_count()
    }

    /// The story with complete prose, or `None` mid-prose.
    pub fn story_with_prose(&self) -> Option<StoryWithProse> {
        if !self.prose_complete() {
            return None;
        }
        let setup = self.prose_setup.clone()?;
        Some(StoryWithProse::compose(
            self.story.clone(),
            Prose {
                setup,
                pages: self.prose_pages.clone(),
            },
        ))
    }

    /// The fully composed story, or `None` before prose and visuals are
    /// complete.
    pub fn composed_story(&self) -> Option<ComposedStory> {
        if !self.visuals_complete() {
            return None;
        }
        let story = self.story_with_prose()?;
        let style_guide = self.style_guide.clone()?;
        Some(ComposedStory::compose(
            story,
            VisualDirection {
                style_guide,
                illustrated_pages: self.illustrated_pages.clone(),
            },
        ))
    }
}
