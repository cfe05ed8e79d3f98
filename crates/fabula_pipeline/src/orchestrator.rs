//! The pipeline orchestrator.
//!
//! Drives one story through the stage state machine, persisting an artifact
//! after every stage transition and every completed page. The orchestrator
//! never retries a generation failure; retry and repair policy lives in the
//! capability wrappers, and the first error aborts the run with stage and
//! page context attached.

use crate::{accumulate, PageGenerator, PageSink, PartialComposedState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fabula_core::{
    BookFormat, ComposedStory, IllustratedPage, NullSink, PipelineConfig, ProgressEvent,
    ProgressSink, ProgressStatus, ProgressStep, Prose, ProsePage, ProseSetup, RenderedBook,
    RenderedPage, StoryArtifact, StoryWithPlot, StoryWithProse, VisualDirection, VisualStyleGuide,
};
use fabula_error::{FabulaResult, PipelineError, PipelineErrorKind};
use fabula_interface::{ProsePageRequest, RenderPageRequest, StoryModel, VisualBeatsRequest};
use fabula_storage::{save_json, ArtifactKind, ArtifactStore};
use serde_json::json;
use std::sync::Arc;

/// Early-stop marker: return the partial composed record instead of
/// continuing past the named stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAfter {
    /// Stop once prose is complete
    Prose,
    /// Stop once visual direction is complete
    Visuals,
}

/// Per-run orchestrator options.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Optional early-stop marker
    pub stop_after: Option<StopAfter>,
    /// Artifact store for the story's folder; `None` runs without persistence
    pub store: Option<Arc<dyn ArtifactStore>>,
    /// Progress event consumer
    pub progress: Arc<dyn ProgressSink>,
    /// Book format passed to the render capability
    pub format: BookFormat,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            stop_after: None,
            store: None,
            progress: Arc::new(NullSink),
            format: BookFormat::Square,
        }
    }
}

impl std::fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("stop_after", &self.stop_after)
            .field("store", &self.store.is_some())
            .field("format", &self.format)
            .finish()
    }
}

impl PipelineOptions {
    /// Options derived from a resolved configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            format: config.format,
            ..Self::default()
        }
    }

    /// Attach an artifact store.
    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the early-stop marker.
    pub fn with_stop_after(mut self, stop_after: StopAfter) -> Self {
        self.stop_after = Some(stop_after);
        self
    }

    /// Set the book format.
    pub fn with_format(mut self, format: BookFormat) -> Self {
        self.format = format;
        self
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Stopped after the prose stage
    Prose(StoryWithProse),
    /// Stopped after the visuals stage
    Visuals(ComposedStory),
    /// Ran to the terminal stage
    Complete {
        /// The canonical full story record
        story: ComposedStory,
        /// The rendered book
        book: RenderedBook,
    },
}

impl PipelineOutcome {
    /// The rendered book, when the run reached the terminal stage.
    pub fn book(&self) -> Option<&RenderedBook> {
        match self {
            PipelineOutcome::Complete { book, .. } => Some(book),
            _ => None,
        }
    }

    /// The fully composed story, when the run got past the visuals stage.
    pub fn composed(&self) -> Option<&ComposedStory> {
        match self {
            PipelineOutcome::Visuals(story) => Some(story),
            PipelineOutcome::Complete { story, .. } => Some(story),
            PipelineOutcome::Prose(_) => None,
        }
    }
}

/// The staged generation pipeline for one story at a time.
#[derive(Debug)]
pub struct Pipeline<M> {
    model: M,
}

impl<M: StoryModel> Pipeline<M> {
    /// Create a pipeline over a generation capability.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Run a plotted story through prose, visuals, and rendering.
    #[tracing::instrument(skip(self, story, options), fields(title = %story.brief.title))]
    pub async fn run(
        &self,
        story: StoryWithPlot,
        options: &PipelineOptions,
    ) -> FabulaResult<PipelineOutcome> {
        self.run_from(PartialComposedState::new(story), options).await
    }

    /// Resume from a story folder, redoing no completed stage or page.
    #[tracing::instrument(skip(self, store, options))]
    pub async fn resume(
        &self,
        store: Arc<dyn ArtifactStore>,
        options: &PipelineOptions,
    ) -> FabulaResult<PipelineOutcome> {
        let state = crate::load_pipeline_state(store.as_ref()).await?;
        let options = options.clone().with_store(store);
        self.run_from(state, &options).await
    }

    /// Re-enter the pipeline from reconstructed mid-run state.
    #[tracing::instrument(skip(self, state, options), fields(
        title = %state.story.brief.title,
        prose_pages = state.prose_pages.len(),
        illustrated_pages = state.illustrated_pages.len(),
        rendered_pages = state.rendered_pages.len(),
    ))]
    pub async fn run_from(
        &self,
        mut state: PartialComposedState,
        options: &PipelineOptions,
    ) -> FabulaResult<PipelineOutcome> {
        let progress = options.progress.as_ref();

        if state.render_complete() && !state.rendered_pages.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::AlreadyComplete(
                state.story.brief.title.clone(),
            ))
            .into());
        }

        self.persist_entry_artifacts(&state, options).await?;
        self.setup_phase(&mut state, options).await?;
        self.prose_stage(&mut state, options).await?;

        let story_with_prose = state.story_with_prose().ok_or_else(|| {
            PipelineError::stage_failed("prose", None, "prose incomplete after prose stage")
        })?;

        if options.stop_after == Some(StopAfter::Prose) {
            progress.emit(ProgressEvent::new(
                ProgressStep::Complete,
                ProgressStatus::Complete,
            ));
            return Ok(PipelineOutcome::Prose(story_with_prose));
        }

        self.visuals_stage(&mut state, &story_with_prose, options)
            .await?;

        let composed = state.composed_story().ok_or_else(|| {
            PipelineError::stage_failed("visuals", None, "visuals incomplete after visuals stage")
        })?;

        if options.stop_after == Some(StopAfter::Visuals) {
            progress.emit(ProgressEvent::new(
                ProgressStep::Complete,
                ProgressStatus::Complete,
            ));
            return Ok(PipelineOutcome::Visuals(composed));
        }

        let book = self.render_stage(&mut state, &composed, options).await?;

        progress.emit(ProgressEvent::new(
            ProgressStep::Complete,
            ProgressStatus::Complete,
        ));
        tracing::info!(
            title = %composed.brief.title,
            pages = book.pages.len(),
            "Pipeline complete"
        );

        Ok(PipelineOutcome::Complete {
            story: composed,
            book,
        })
    }

    /// Persist brief, plot, and (entering fresh) the draft story record.
    async fn persist_entry_artifacts(
        &self,
        state: &PartialComposedState,
        options: &PipelineOptions,
    ) -> FabulaResult<()> {
        let Some(store) = &options.store else {
            return Ok(());
        };

        save_json(store.as_ref(), ArtifactKind::Brief, &state.story.brief).await?;
        save_json(store.as_ref(), ArtifactKind::Plot, &state.story.plot).await?;

        // A composed story.json (even with partial visuals) must never be
        // replaced by a draft.
        if state.style_guide.is_none() && state.illustrated_pages.is_empty() {
            save_json(
                store.as_ref(),
                ArtifactKind::Story,
                &StoryArtifact::Draft(state.story.clone()),
            )
            .await?;
        }
        Ok(())
    }

    /// Generate prose setup and style guide, concurrently when both are
    /// needed. Both must resolve before any per-page prose.
    async fn setup_phase(
        &self,
        state: &mut PartialComposedState,
        options: &PipelineOptions,
    ) -> FabulaResult<()> {
        let progress = options.progress.as_ref();
        let need_setup = state.prose_setup.is_none();
        // The style guide only matters if the run proceeds to visuals.
        let need_style =
            state.style_guide.is_none() && options.stop_after != Some(StopAfter::Prose);

        match (need_setup, need_style) {
            (true, true) => {
                let (setup, style_guide) = tokio::try_join!(
                    self.generate_setup(&state.story, progress),
                    self.generate_style_guide(&state.story, progress),
                )?;
                state.prose_setup = Some(setup);
                state.style_guide = Some(style_guide);
            }
            (true, false) => {
                state.prose_setup = Some(self.generate_setup(&state.story, progress).await?);
            }
            (false, true) => {
                state.style_guide =
                    Some(self.generate_style_guide(&state.story, progress).await?);
            }
            (false, false) => {}
        }
        Ok(())
    }

    async fn generate_setup(
        &self,
        story: &StoryWithPlot,
        progress: &dyn ProgressSink,
    ) -> FabulaResult<ProseSetup> {
        progress.emit(ProgressEvent::new(
            ProgressStep::Setup,
            ProgressStatus::Start,
        ));
        match self.model.generate_prose_setup(story).await {
            Ok(setup) => {
                progress.emit(ProgressEvent::new(
                    ProgressStep::Setup,
                    ProgressStatus::Complete,
                ));
                Ok(setup)
            }
            Err(e) => {
                progress.emit(
                    ProgressEvent::new(ProgressStep::Setup, ProgressStatus::Error)
                        .with_payload(json!({ "message": e.to_string() })),
                );
                Err(PipelineError::stage_failed("prose", None, e.to_string()).into())
            }
        }
    }

    async fn generate_style_guide(
        &self,
        story: &StoryWithPlot,
        progress: &dyn ProgressSink,
    ) -> FabulaResult<VisualStyleGuide> {
        progress.emit(ProgressEvent::new(
            ProgressStep::StyleGuide,
            ProgressStatus::Start,
        ));
        match self.model.generate_style_guide(story).await {
            Ok(style_guide) => {
                progress.emit(ProgressEvent::new(
                    ProgressStep::StyleGuide,
                    ProgressStatus::Complete,
                ));
                Ok(style_guide)
            }
            Err(e) => {
                progress.emit(
                    ProgressEvent::new(ProgressStep::StyleGuide, ProgressStatus::Error)
                        .with_payload(json!({ "message": e.to_string() })),
                );
                Err(PipelineError::stage_failed("visuals", None, e.to_string()).into())
            }
        }
    }

    async fn prose_stage(
        &self,
        state: &mut PartialComposedState,
        options: &PipelineOptions,
    ) -> FabulaResult<()> {
        if state.prose_complete() {
            return Ok(());
        }
        let setup = state.prose_setup.clone().ok_or_else(|| {
            PipelineError::stage_failed("prose", None, "prose setup missing before prose pages")
        })?;

        let page_count = state.page_count();
        let completed = std::mem::take(&mut state.prose_pages);
        let pages = {
            let generator = ProsePageGen {
                model: &self.model,
                story: &state.story,
                setup: &setup,
                progress: options.progress.as_ref(),
            };
            let sink = ProseCheckpoint {
                setup: &setup,
                store: options.store.clone(),
                progress: options.progress.as_ref(),
            };
            accumulate(page_count, completed, &generator, &sink).await?
        };
        state.prose_pages = pages;
        Ok(())
    }

    async fn visuals_stage(
        &self,
        state: &mut PartialComposedState,
        story: &StoryWithProse,
        options: &PipelineOptions,
    ) -> FabulaResult<()> {
        if state.visuals_complete() {
            return Ok(());
        }
        let style_guide = state.style_guide.clone().ok_or_else(|| {
            PipelineError::stage_failed("visuals", None, "style guide missing before visual beats")
        })?;

        let page_count = state.page_count();
        let completed = std::mem::take(&mut state.illustrated_pages);
        let pages = {
            let generator = VisualsPageGen {
                model: &self.model,
                story,
                style_guide: &style_guide,
                progress: options.progress.as_ref(),
            };
            let sink = ComposedCheckpoint {
                story,
                style_guide: &style_guide,
                store: options.store.clone(),
                progress: options.progress.as_ref(),
            };
            accumulate(page_count, completed, &generator, &sink).await?
        };
        state.illustrated_pages = pages;
        Ok(())
    }

    async fn render_stage(
        &self,
        state: &mut PartialComposedState,
        composed: &ComposedStory,
        options: &PipelineOptions,
    ) -> FabulaResult<RenderedBook> {
        // Stable across checkpoints: a resumed render keeps the original
        // start time.
        let created_at = state.render_started_at.unwrap_or_else(Utc::now);

        let page_count = state.page_count();
        let completed = std::mem::take(&mut state.rendered_pages);
        let pages = {
            let generator = RenderPageGen {
                model: &self.model,
                composed,
                format: options.format,
                progress: options.progress.as_ref(),
            };
            let sink = BookCheckpoint {
                composed,
                format: options.format,
                created_at,
                store: options.store.clone(),
                progress: options.progress.as_ref(),
            };
            accumulate(page_count, completed, &generator, &sink).await?
        };
        state.rendered_pages = pages;

        Ok(RenderedBook {
            title: composed.brief.title.clone(),
            age_range: composed.brief.age_range,
            format: options.format,
            pages: state.rendered_pages.clone(),
            created_at,
        })
    }
}

struct ProsePageGen<'a, M> {
    model: &'a M,
    story: &'a StoryWithPlot,
    setup: &'a ProseSetup,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl<M: StoryModel> PageGenerator<ProsePage> for ProsePageGen<'_, M> {
    async fn generate(&self, page_number: u32, prior: &[ProsePage]) -> FabulaResult<ProsePage> {
        self.progress.emit(ProgressEvent::new(
            ProgressStep::ProsePage(page_number),
            ProgressStatus::Start,
        ));
        let req = ProsePageRequest {
            story: self.story,
            prose_setup: self.setup,
            page_number,
            prior_pages: prior,
        };
        let page = match self.model.generate_prose_page(&req).await {
            Ok(page) => page,
            Err(e) => {
                self.progress.emit(
                    ProgressEvent::new(ProgressStep::ProsePage(page_number), ProgressStatus::Error)
                        .with_payload(json!({ "message": e.to_string() })),
                );
                return Err(
                    PipelineError::stage_failed("prose", Some(page_number), e.to_string()).into(),
                );
            }
        };
        check_page_number("prose", page_number, page.page_number)?;
        Ok(page)
    }
}

struct ProseCheckpoint<'a> {
    setup: &'a ProseSetup,
    store: Option<Arc<dyn ArtifactStore>>,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl PageSink<ProsePage> for ProseCheckpoint<'_> {
    async fn on_page(&self, page: &ProsePage, pages_so_far: &[ProsePage]) -> FabulaResult<()> {
        if let Some(store) = &self.store {
            let prose = Prose {
                setup: self.setup.clone(),
                pages: pages_so_far.to_vec(),
            };
            save_json(store.as_ref(), ArtifactKind::Prose, &prose).await?;
        }
        self.progress.emit(ProgressEvent::new(
            ProgressStep::ProsePage(page.page_number),
            ProgressStatus::Complete,
        ));
        Ok(())
    }
}

struct VisualsPageGen<'a, M> {
    model: &'a M,
    story: &'a StoryWithProse,
    style_guide: &'a VisualStyleGuide,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl<M: StoryModel> PageGenerator<IllustratedPage> for VisualsPageGen<'_, M> {
    async fn generate(
        &self,
        page_number: u32,
        prior: &[IllustratedPage],
    ) -> FabulaResult<IllustratedPage> {
        self.progress.emit(ProgressEvent::new(
            ProgressStep::VisualsPage(page_number),
            ProgressStatus::Start,
        ));
        let prose_page = self
            .story
            .prose
            .pages
            .get(page_number as usize - 1)
            .ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::PageSequence {
                    stage: "visuals".to_string(),
                    message: format!("no prose page {} to illustrate", page_number),
                })
            })?;
        let req = VisualBeatsRequest {
            story: self.story,
            style_guide: self.style_guide,
            page_number,
            prose_page,
            prior_pages: prior,
        };
        let page = match self.model.generate_visual_beats(&req).await {
            Ok(page) => page,
            Err(e) => {
                self.progress.emit(
                    ProgressEvent::new(
                        ProgressStep::VisualsPage(page_number),
                        ProgressStatus::Error,
                    )
                    .with_payload(json!({ "message": e.to_string() })),
                );
                return Err(
                    PipelineError::stage_failed("visuals", Some(page_number), e.to_string())
                        .into(),
                );
            }
        };
        check_page_number("visuals", page_number, page.page_number)?;
        Ok(page)
    }
}

/// Checkpoints the visuals stage by rewriting `story.json` as a composed
/// record with however many illustrated pages exist so far.
struct ComposedCheckpoint<'a> {
    story: &'a StoryWithProse,
    style_guide: &'a VisualStyleGuide,
    store: Option<Arc<dyn ArtifactStore>>,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl PageSink<IllustratedPage> for ComposedCheckpoint<'_> {
    async fn on_page(
        &self,
        page: &IllustratedPage,
        pages_so_far: &[IllustratedPage],
    ) -> FabulaResult<()> {
        if let Some(store) = &self.store {
            let composed = ComposedStory::compose(
                self.story.clone(),
                VisualDirection {
                    style_guide: self.style_guide.clone(),
                    illustrated_pages: pages_so_far.to_vec(),
                },
            );
            save_json(
                store.as_ref(),
                ArtifactKind::Story,
                &StoryArtifact::Composed(composed),
            )
            .await?;
        }
        self.progress.emit(ProgressEvent::new(
            ProgressStep::VisualsPage(page.page_number),
            ProgressStatus::Complete,
        ));
        Ok(())
    }
}

struct RenderPageGen<'a, M> {
    model: &'a M,
    composed: &'a ComposedStory,
    format: BookFormat,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl<M: StoryModel> PageGenerator<RenderedPage> for RenderPageGen<'_, M> {
    async fn generate(
        &self,
        page_number: u32,
        _prior: &[RenderedPage],
    ) -> FabulaResult<RenderedPage> {
        self.progress.emit(ProgressEvent::new(
            ProgressStep::RenderPage(page_number),
            ProgressStatus::Start,
        ));
        let req = RenderPageRequest {
            composed_story: self.composed,
            page_number,
            format: self.format,
        };
        let page = match self.model.render_page(&req).await {
            Ok(page) => page,
            Err(e) => {
                self.progress.emit(
                    ProgressEvent::new(ProgressStep::RenderPage(page_number), ProgressStatus::Error)
                        .with_payload(json!({ "message": e.to_string() })),
                );
                return Err(
                    PipelineError::stage_failed("book", Some(page_number), e.to_string()).into(),
                );
            }
        };
        check_page_number("book", page_number, page.page_number)?;
        Ok(page)
    }
}

/// Checkpoints the render stage as a partial `book.json` with a stable
/// creation timestamp.
struct BookCheckpoint<'a> {
    composed: &'a ComposedStory,
    format: BookFormat,
    created_at: DateTime<Utc>,
    store: Option<Arc<dyn ArtifactStore>>,
    progress: &'a dyn ProgressSink,
}

#[async_trait]
impl PageSink<RenderedPage> for BookCheckpoint<'_> {
    async fn on_page(
        &self,
        page: &RenderedPage,
        pages_so_far: &[RenderedPage],
    ) -> FabulaResult<()> {
        if let Some(store) = &self.store {
            let book = RenderedBook {
                title: self.composed.brief.title.clone(),
                age_range: self.composed.brief.age_range,
                format: self.format,
                pages: pages_so_far.to_vec(),
                created_at: self.created_at,
            };
            save_json(store.as_ref(), ArtifactKind::Book, &book).await?;
        }
        self.progress.emit(ProgressEvent::new(
            ProgressStep::RenderPage(page.page_number),
            ProgressStatus::Complete,
        ));
        Ok(())
    }
}

fn check_page_number(stage: &str, requested: u32, returned: u32) -> FabulaResult<()> {
    if requested != returned {
        return Err(PipelineError::new(PipelineErrorKind::PageSequence {
            stage: stage.to_string(),
            message: format!("requested page {}, model returned page {}", requested, returned),
        })
        .into());
    }
    Ok(())
}
