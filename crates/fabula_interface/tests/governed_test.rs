//! Tests for the rate-limit retry policy in `Governed`.

mod test_utils;

use async_trait::async_trait;
use fabula_core::{
    Brief, BriefDraft, IllustratedPage, PlotStructure, ProsePage, ProseSetup, RenderedPage,
    StoryWithPlot, VisualStyleGuide,
};
use fabula_error::{CapabilityError, CapabilityErrorKind, FabulaResult};
use fabula_interface::{
    Governed, ProsePageRequest, RenderPageRequest, RequestLimiter, StoryModel, VisualBeatsRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{sample_brief, valid_plot};

/// Model whose `generate_plot` rate-limits the first `fail_times` calls.
struct RateLimitingModel {
    fail_times: usize,
    retry_after: Duration,
    calls: Arc<AtomicUsize>,
}

impl RateLimitingModel {
    fn new(fail_times: usize, retry_after: Duration) -> Self {
        Self {
            fail_times,
            retry_after,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

fn not_scripted<T>() -> FabulaResult<T> {
    Err(CapabilityError::new(CapabilityErrorKind::Provider("not scripted".to_string())).into())
}

#[async_trait]
impl StoryModel for RateLimitingModel {
    async fn extract_requirements(&self, _raw: &str) -> FabulaResult<BriefDraft> {
        not_scripted()
    }

    async fn generate_plot(&self, _brief: &Brief) -> FabulaResult<PlotStructure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            Err(CapabilityError::rate_limited(self.retry_after).into())
        } else {
            Ok(valid_plot())
        }
    }

    async fn generate_style_guide(
        &self,
        _story: &StoryWithPlot,
    ) -> FabulaResult<VisualStyleGuide> {
        not_scripted()
    }

    async fn generate_prose_setup(&self, _story: &StoryWithPlot) -> FabulaResult<ProseSetup> {
        not_scripted()
    }

    async fn generate_prose_page(&self, _req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage> {
        not_scripted()
    }

    async fn generate_visual_beats(
        &self,
        _req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage> {
        not_scripted()
    }

    async fn render_page(&self, _req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage> {
        not_scripted()
    }
}

#[tokio::test]
async fn rate_limit_is_retried_exactly_once() {
    let model = RateLimitingModel::new(1, Duration::from_millis(10));
    let calls = Arc::clone(&model.calls);
    let governed = Governed::new(model, RequestLimiter::unlimited());

    let plot = governed.generate_plot(&sample_brief()).await.unwrap();
    assert_eq!(plot.beats.len(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn second_rate_limit_surfaces_the_failure() {
    let model = RateLimitingModel::new(2, Duration::from_millis(5));
    let calls = Arc::clone(&model.calls);
    let governed = Governed::new(model, RequestLimiter::unlimited());

    let err = governed.generate_plot(&sample_brief()).await.unwrap_err();
    assert!(err.as_capability().and_then(|c| c.retry_after()).is_some());
    // One original call plus one retry, never more.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn non_rate_limit_errors_are_not_retried() {
    let model = RateLimitingModel::new(0, Duration::ZERO);
    let governed = Governed::new(model, RequestLimiter::unlimited());

    let err = governed
        .extract_requirements("a story about a firefly")
        .await
        .unwrap_err();
    assert!(err.as_capability().and_then(|c| c.retry_after()).is_none());
}

#[tokio::test]
async fn retry_sleeps_for_the_providers_duration() {
    let retry_after = Duration::from_millis(50);
    let model = RateLimitingModel::new(1, retry_after);
    let governed = Governed::new(model, RequestLimiter::unlimited());

    let started = std::time::Instant::now();
    governed.generate_plot(&sample_brief()).await.unwrap();
    assert!(started.elapsed() >= retry_after);
}
