//! Resume detection over a story folder's persisted artifacts.
//!
//! Detection inspects artifacts most-advanced-first and maps the folder to
//! the stage the pipeline should re-enter. Completeness matters: a prose
//! artifact with fewer pages than the brief's page count re-enters the prose
//! stage mid-fold rather than skipping ahead. The detector never guesses; an
//! artifact it cannot classify is a typed error.

use crate::PartialComposedState;
use fabula_core::{Brief, PlotStructure, Prose, RenderedBook, StoryArtifact, StoryWithPlot};
use fabula_error::{FabulaResult, ResumeError, ResumeErrorKind};
use fabula_storage::{ArtifactKind, ArtifactStore};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// The stage a story folder should re-enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeStage {
    /// Only a brief exists; plot generation has not run
    Plot,
    /// Plot exists; prose generation is pending or mid-fold
    Prose,
    /// Prose is complete; visual beats are pending or mid-fold
    Visuals,
    /// The story is fully composed; rendering is pending or mid-fold
    Render,
    /// A complete book exists; nothing left to do
    Complete,
}

/// Where to resume, and the artifact that decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePoint {
    /// The stage to re-enter
    pub stage: ResumeStage,
    /// The most advanced artifact found
    pub artifact_path: PathBuf,
}

/// Deserialize a persisted artifact, mapping parse failures to a corrupt
/// artifact error naming the file.
async fn load_artifact<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
) -> FabulaResult<Option<T>> {
    match store.load(kind).await? {
        Some(value) => {
            let parsed = serde_json::from_value(value).map_err(|e| {
                ResumeError::new(ResumeErrorKind::CorruptArtifact {
                    artifact: kind.filename().to_string(),
                    message: e.to_string(),
                })
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

async fn load_story_artifact(
    store: &dyn ArtifactStore,
) -> FabulaResult<Option<StoryArtifact>> {
    match store.load(ArtifactKind::Story).await? {
        Some(value) => Ok(Some(StoryArtifact::from_value(
            value,
            ArtifactKind::Story.filename(),
        )?)),
        None => Ok(None),
    }
}

/// Map a story folder to the stage it should re-enter.
///
/// Precedence, most advanced first: a complete book is done and a partial
/// one re-enters rendering; a composed story re-enters rendering or the
/// visuals fold depending on completeness; a draft story is treated as not
/// past plot; prose re-enters visuals, except that partial prose alongside
/// a plot source re-enters the prose fold; a plot (or legacy blurb)
/// re-enters prose; a brief alone re-enters plot generation.
///
/// # Errors
///
/// [`ResumeErrorKind::NoArtifacts`] for an empty folder,
/// [`ResumeErrorKind::AmbiguousArtifact`] when a legacy artifact cannot be
/// classified, [`ResumeErrorKind::CorruptArtifact`] when one fails to parse.
#[tracing::instrument(skip(store))]
pub async fn detect_stage(store: &dyn ArtifactStore) -> FabulaResult<ResumePoint> {
    let brief: Option<Brief> = load_artifact(store, ArtifactKind::Brief).await?;

    if let Some(book) = load_artifact::<RenderedBook>(store, ArtifactKind::Book).await? {
        // Page count comes from the brief, or failing that the story record.
        let page_count = match &brief {
            Some(brief) => Some(brief.page_count),
            None => match load_story_artifact(store).await? {
                Some(StoryArtifact::Composed(c)) => Some(c.page_count()),
                Some(StoryArtifact::Draft(d)) => Some(d.page_count()),
                None => None,
            },
        };
        let page_count = page_count.ok_or_else(|| {
            ResumeError::new(ResumeErrorKind::AmbiguousArtifact {
                artifact: ArtifactKind::Book.filename().to_string(),
                message: "no brief or story artifact to establish page count".to_string(),
            })
        })?;

        let stage = if book.is_complete(page_count) {
            ResumeStage::Complete
        } else {
            ResumeStage::Render
        };
        tracing::info!(?stage, pages = book.pages.len(), "Resume point from book artifact");
        return Ok(ResumePoint {
            stage,
            artifact_path: store.path_for(ArtifactKind::Book),
        });
    }

    let story_artifact = load_story_artifact(store).await?;
    if let Some(StoryArtifact::Composed(composed)) = &story_artifact {
        let stage = if composed.visuals.is_complete(composed.page_count()) {
            ResumeStage::Render
        } else {
            ResumeStage::Visuals
        };
        tracing::info!(
            ?stage,
            illustrated_pages = composed.visuals.illustrated_pages.len(),
            "Resume point from composed story artifact"
        );
        return Ok(ResumePoint {
            stage,
            artifact_path: store.path_for(ArtifactKind::Story),
        });
    }

    if let Some(prose) = load_artifact::<Prose>(store, ArtifactKind::Prose).await? {
        let page_count = match (&brief, &story_artifact) {
            (Some(brief), _) => Some(brief.page_count),
            (None, Some(StoryArtifact::Draft(draft))) => Some(draft.page_count()),
            (None, _) => None,
        };
        // Re-entering the prose fold needs a plot to rebuild the story.
        // Without one (or without a page count) the artifact precedence
        // stands: prose hands off to visuals.
        let has_plot = matches!(&story_artifact, Some(StoryArtifact::Draft(_)))
            || store.load(ArtifactKind::Plot).await?.is_some();
        let stage = match page_count {
            Some(page_count) if !prose.is_complete(page_count) && has_plot => ResumeStage::Prose,
            _ => ResumeStage::Visuals,
        };
        tracing::info!(?stage, pages = prose.pages.len(), "Resume point from prose artifact");
        return Ok(ResumePoint {
            stage,
            artifact_path: store.path_for(ArtifactKind::Prose),
        });
    }

    // A draft story record carries the plot.
    if story_artifact.is_some() {
        return Ok(ResumePoint {
            stage: ResumeStage::Prose,
            artifact_path: store.path_for(ArtifactKind::Story),
        });
    }

    if store.load(ArtifactKind::Plot).await?.is_some() {
        return Ok(ResumePoint {
            stage: ResumeStage::Prose,
            artifact_path: store.path_for(ArtifactKind::Plot),
        });
    }

    if brief.is_some() {
        return Ok(ResumePoint {
            stage: ResumeStage::Plot,
            artifact_path: store.path_for(ArtifactKind::Brief),
        });
    }

    let folder = store
        .path_for(ArtifactKind::Brief)
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    Err(ResumeError::new(ResumeErrorKind::NoArtifacts(folder)).into())
}

/// Reconstruct mid-pipeline state from a story folder.
///
/// Brief and plot are always recovered; prose, visuals, and rendered pages
/// are attached when their artifacts exist, including partial per-page
/// progress. Re-entering the pipeline from the result redoes no completed
/// stage and no completed page.
///
/// # Errors
///
/// [`ResumeErrorKind::NoArtifacts`] when the folder does not hold at least a
/// brief and a plot; classification and parse errors as in [`detect_stage`].
#[tracing::instrument(skip(store))]
pub async fn load_pipeline_state(store: &dyn ArtifactStore) -> FabulaResult<PartialComposedState> {
    let story_artifact = load_story_artifact(store).await?;

    let mut state = match story_artifact {
        Some(StoryArtifact::Composed(composed)) => {
            let story = StoryWithPlot {
                brief: composed.brief,
                plot: composed.plot,
            };
            let mut state = PartialComposedState::new(story);
            state.prose_setup = Some(composed.prose.setup);
            state.prose_pages = composed.prose.pages;
            state.style_guide = Some(composed.visuals.style_guide);
            state.illustrated_pages = composed.visuals.illustrated_pages;
            state
        }
        Some(StoryArtifact::Draft(draft)) => PartialComposedState::new(draft),
        None => {
            let brief: Option<Brief> = load_artifact(store, ArtifactKind::Brief).await?;
            let plot: Option<PlotStructure> = load_artifact(store, ArtifactKind::Plot).await?;
            match (brief, plot) {
                (Some(brief), Some(plot)) => {
                    PartialComposedState::new(StoryWithPlot::compose(brief, plot))
                }
                _ => {
                    let folder = store
                        .path_for(ArtifactKind::Brief)
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    return Err(ResumeError::new(ResumeErrorKind::NoArtifacts(folder)).into());
                }
            }
        }
    };

    // Overlay a standalone prose checkpoint unless the story record already
    // carried prose.
    if state.prose_setup.is_none() {
        if let Some(prose) = load_artifact::<Prose>(store, ArtifactKind::Prose).await? {
            state.attach_prose(prose)?;
        }
    }

    if let Some(book) = load_artifact::<RenderedBook>(store, ArtifactKind::Book).await? {
        state.render_started_at = Some(book.created_at);
        state.rendered_pages = book.pages;
    }

    tracing::info!(
        title = %state.story.brief.title,
        prose_pages = state.prose_pages.len(),
        illustrated_pages = state.illustrated_pages.len(),
        rendered_pages = state.rendered_pages.len(),
        "Reconstructed pipeline state"
    );
    Ok(state)
}
