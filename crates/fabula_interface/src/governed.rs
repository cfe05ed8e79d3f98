//! Rate-limit handling wrapper for story models.

use crate::{ProsePageRequest, RenderPageRequest, RequestLimiter, StoryModel, VisualBeatsRequest};
use async_trait::async_trait;
use fabula_core::{
    Brief, BriefDraft, IllustratedPage, PlotStructure, ProsePage, ProseSetup, RenderedPage,
    StoryWithPlot, VisualStyleGuide,
};
use fabula_error::{FabulaError, FabulaResult};
use serde_json::Value;
use std::time::Duration;

/// Wraps a [`StoryModel`] with the capability-layer rate-limit policy.
///
/// Before each call a permit is acquired from the [`RequestLimiter`]. When
/// the provider signals a transient rate limit with a retry-after duration,
/// the wrapper sleeps exactly that duration and retries once; a second
/// rate-limit failure surfaces to the caller. Nothing else is retried.
pub struct Governed<M> {
    model: M,
    limiter: RequestLimiter,
}

impl<M> Governed<M> {
    /// Wrap a model with the given request limiter.
    pub fn new(model: M, limiter: RequestLimiter) -> Self {
        Self { model, limiter }
    }

    /// Get a reference to the wrapped model.
    pub fn inner(&self) -> &M {
        &self.model
    }
}

fn retry_after(error: &FabulaError) -> Option<Duration> {
    error.as_capability().and_then(|c| c.retry_after())
}

macro_rules! governed_call {
    ($self:ident, $name:literal, $method:ident ( $($arg:expr),* )) => {{
        $self.limiter.acquire().await;
        match $self.model.$method($($arg),*).await {
            Ok(value) => Ok(value),
            Err(error) => match retry_after(&error) {
                Some(wait) => {
                    tracing::warn!(
                        capability = $name,
                        wait_ms = wait.as_millis() as u64,
                        "Rate limited, sleeping for provider's retry-after then retrying once"
                    );
                    tokio::time::sleep(wait).await;
                    $self.limiter.acquire().await;
                    $self.model.$method($($arg),*).await
                }
                None => Err(error),
            },
        }
    }};
}

#[async_trait]
impl<M: StoryModel> StoryModel for Governed<M> {
    async fn extract_requirements(&self, raw: &str) -> FabulaResult<BriefDraft> {
        governed_call!(self, "extract-requirements", extract_requirements(raw))
    }

    async fn generate_plot(&self, brief: &Brief) -> FabulaResult<PlotStructure> {
        governed_call!(self, "generate-plot", generate_plot(brief))
    }

    async fn generate_style_guide(
        &self,
        story: &StoryWithPlot,
    ) -> FabulaResult<VisualStyleGuide> {
        governed_call!(self, "generate-style-guide", generate_style_guide(story))
    }

    async fn generate_prose_setup(&self, story: &StoryWithPlot) -> FabulaResult<ProseSetup> {
        governed_call!(self, "generate-prose-setup", generate_prose_setup(story))
    }

    async fn generate_prose_page(&self, req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage> {
        governed_call!(self, "generate-prose-page", generate_prose_page(req))
    }

    async fn generate_visual_beats(
        &self,
        req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage> {
        governed_call!(self, "generate-visual-beats", generate_visual_beats(req))
    }

    async fn render_page(&self, req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage> {
        governed_call!(self, "render-page", render_page(req))
    }

    async fn repair_output(
        &self,
        kind: &str,
        raw: &Value,
        violation: &str,
    ) -> FabulaResult<Value> {
        governed_call!(self, "repair-output", repair_output(kind, raw, violation))
    }
}
