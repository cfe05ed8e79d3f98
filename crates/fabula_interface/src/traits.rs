//! The generation capability trait.

use crate::{ProsePageRequest, RenderPageRequest, VisualBeatsRequest};
use async_trait::async_trait;
use fabula_core::{
    Brief, BriefDraft, IllustratedPage, PlotStructure, ProsePage, ProseSetup, RenderedPage,
    StoryWithPlot, VisualStyleGuide,
};
use fabula_error::{CapabilityError, CapabilityErrorKind, FabulaResult};
use serde_json::Value;
use std::sync::Arc;

/// The fixed set of generation capabilities the pipeline consumes.
///
/// Every method is a suspension point: a network-bound call to an external
/// model that may fail, rate-limit, or return malformed output. The pipeline
/// awaits each call's full resolution before issuing the next for the same
/// story; it never retries a call itself - that policy lives in the
/// [`Governed`](crate::Governed) and [`Validated`](crate::Validated) wrappers.
#[async_trait]
pub trait StoryModel: Send + Sync {
    /// Extract requirements from the user's raw story idea.
    ///
    /// The result may be partial; drafts from repeated passes merge via
    /// [`BriefDraft::merge`].
    async fn extract_requirements(&self, raw: &str) -> FabulaResult<BriefDraft>;

    /// Generate the narrative skeleton for a brief.
    async fn generate_plot(&self, brief: &Brief) -> FabulaResult<PlotStructure>;

    /// Generate the global illustration style for a plotted story.
    async fn generate_style_guide(&self, story: &StoryWithPlot)
    -> FabulaResult<VisualStyleGuide>;

    /// Generate the story-wide voice for a plotted story.
    async fn generate_prose_setup(&self, story: &StoryWithPlot) -> FabulaResult<ProseSetup>;

    /// Generate the prose for one page, given all prior pages.
    async fn generate_prose_page(&self, req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage>;

    /// Generate the illustration beats for one page.
    async fn generate_visual_beats(
        &self,
        req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage>;

    /// Render one page to an image.
    async fn render_page(&self, req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage>;

    /// Ask the model to correct output that failed schema validation.
    ///
    /// `raw` is the serialized invalid output and `violation` names the
    /// specific validation failure. Implementations re-ask the same model;
    /// the default declines, which makes repair a no-op for simple models.
    async fn repair_output(
        &self,
        kind: &str,
        raw: &Value,
        violation: &str,
    ) -> FabulaResult<Value> {
        let _ = (raw, violation);
        Err(CapabilityError::new(CapabilityErrorKind::RepairNotSupported(kind.to_string())).into())
    }
}

/// A shared model is a model, so a caller can keep a handle to the same
/// instance the pipeline owns. Delegates every method, including any
/// overridden `repair_output`.
#[async_trait]
impl<M: StoryModel + ?Sized> StoryModel for Arc<M> {
    async fn extract_requirements(&self, raw: &str) -> FabulaResult<BriefDraft> {
        (**self).extract_requirements(raw).await
    }

    async fn generate_plot(&self, brief: &Brief) -> FabulaResult<PlotStructure> {
        (**self).generate_plot(brief).await
    }

    async fn generate_style_guide(
        &self,
        story: &StoryWithPlot,
    ) -> FabulaResult<VisualStyleGuide> {
        (**self).generate_style_guide(story).await
    }

    async fn generate_prose_setup(&self, story: &StoryWithPlot) -> FabulaResult<ProseSetup> {
        (**self).generate_prose_setup(story).await
    }

    async fn generate_prose_page(&self, req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage> {
        (**self).generate_prose_page(req).await
    }

    async fn generate_visual_beats(
        &self,
        req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage> {
        (**self).generate_visual_beats(req).await
    }

    async fn render_page(&self, req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage> {
        (**self).render_page(req).await
    }

    async fn repair_output(
        &self,
        kind: &str,
        raw: &Value,
        violation: &str,
    ) -> FabulaResult<Value> {
        (**self).repair_output(kind, raw, violation).await
    }
}
