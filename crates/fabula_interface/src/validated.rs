//! Schema validation and best-effort repair wrapper for story models.

use crate::{ProsePageRequest, RenderPageRequest, StoryModel, VisualBeatsRequest};
use async_trait::async_trait;
use fabula_core::{
    Brief, BriefDraft, IllustratedPage, PlotStructure, ProsePage, ProseSetup, RenderedPage,
    StoryWithPlot, Validate, VisualStyleGuide,
};
use fabula_error::{CapabilityError, CapabilityErrorKind, FabulaResult};
use serde::de::DeserializeOwned;

/// Wraps a [`StoryModel`] with output schema validation.
///
/// Every typed output is checked against its domain bounds. When validation
/// fails the wrapper serializes the invalid value and gives the model one
/// repair pass via [`StoryModel::repair_output`], re-validating the result.
/// If repair fails, declines, or produces another invalid value, the
/// *original* validation error propagates.
pub struct Validated<M> {
    model: M,
}

impl<M> Validated<M> {
    /// Wrap a model.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Get a reference to the wrapped model.
    pub fn inner(&self) -> &M {
        &self.model
    }
}

impl<M: StoryModel> Validated<M> {
    async fn check<T>(&self, output: T) -> FabulaResult<T>
    where
        T: Validate + serde::Serialize + DeserializeOwned,
    {
        let violation = match output.validate() {
            Ok(()) => return Ok(output),
            Err(violation) => violation,
        };

        let kind = output.kind_name();
        let original = CapabilityError::new(CapabilityErrorKind::MalformedOutput {
            kind: kind.to_string(),
            violation: violation.clone(),
        });

        tracing::warn!(kind, %violation, "Output failed validation, attempting repair");

        let raw = match serde_json::to_value(&output) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(kind, error = %e, "Could not serialize output for repair");
                return Err(original.into());
            }
        };

        match self.model.repair_output(kind, &raw, &violation).await {
            Ok(repaired) => match serde_json::from_value::<T>(repaired) {
                Ok(candidate) if candidate.validate().is_ok() => {
                    tracing::info!(kind, "Repair produced a valid output");
                    Ok(candidate)
                }
                Ok(_) => {
                    tracing::warn!(kind, "Repaired output still invalid");
                    Err(original.into())
                }
                Err(e) => {
                    tracing::warn!(kind, error = %e, "Repaired output failed to deserialize");
                    Err(original.into())
                }
            },
            Err(e) => {
                tracing::debug!(kind, error = %e, "Repair declined or failed");
                Err(original.into())
            }
        }
    }
}

#[async_trait]
impl<M: StoryModel> StoryModel for Validated<M> {
    // Drafts are intentionally partial; there is nothing to validate yet.
    async fn extract_requirements(&self, raw: &str) -> FabulaResult<BriefDraft> {
        self.model.extract_requirements(raw).await
    }

    async fn generate_plot(&self, brief: &Brief) -> FabulaResult<PlotStructure> {
        let plot = self.model.generate_plot(brief).await?;
        self.check(plot).await
    }

    async fn generate_style_guide(
        &self,
        story: &StoryWithPlot,
    ) -> FabulaResult<VisualStyleGuide> {
        let guide = self.model.generate_style_guide(story).await?;
        self.check(guide).await
    }

    async fn generate_prose_setup(&self, story: &StoryWithPlot) -> FabulaResult<ProseSetup> {
        let setup = self.model.generate_prose_setup(story).await?;
        self.check(setup).await
    }

    async fn generate_prose_page(&self, req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage> {
        let page = self.model.generate_prose_page(req).await?;
        self.check(page).await
    }

    async fn generate_visual_beats(
        &self,
        req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage> {
        let page = self.model.generate_visual_beats(req).await?;
        self.check(page).await
    }

    async fn render_page(&self, req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage> {
        let page = self.model.render_page(req).await?;
        self.check(page).await
    }

    async fn repair_output(
        &self,
        kind: &str,
        raw: &serde_json::Value,
        violation: &str,
    ) -> FabulaResult<serde_json::Value> {
        self.model.repair_output(kind, raw, violation).await
    }
}
