//! Tests for schema validation and the single repair pass in `Validated`.

mod test_utils;

use async_trait::async_trait;
use fabula_core::{
    Brief, BriefDraft, IllustratedPage, PlotStructure, ProsePage, ProseSetup, RenderedPage,
    StoryWithPlot, VisualStyleGuide,
};
use fabula_error::{
    CapabilityError, CapabilityErrorKind, FabulaErrorKind, FabulaResult,
};
use fabula_interface::{
    ProsePageRequest, RenderPageRequest, StoryModel, Validated, VisualBeatsRequest,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use test_utils::{invalid_plot, sample_brief, valid_plot};

/// How the mock responds to a repair request.
enum RepairBehavior {
    /// Return a corrected plot
    Fix,
    /// Return a value that is still invalid
    StillBroken,
    /// Use the default declining implementation
    Decline,
}

struct MalformedPlotModel {
    repair: RepairBehavior,
    repair_calls: Arc<AtomicUsize>,
    captured_violation: Arc<Mutex<Option<String>>>,
}

impl MalformedPlotModel {
    fn new(repair: RepairBehavior) -> Self {
        Self {
            repair,
            repair_calls: Arc::new(AtomicUsize::new(0)),
            captured_violation: Arc::new(Mutex::new(None)),
        }
    }
}

fn not_scripted<T>() -> FabulaResult<T> {
    Err(CapabilityError::new(CapabilityErrorKind::Provider("not scripted".to_string())).into())
}

#[async_trait]
impl StoryModel for MalformedPlotModel {
    async fn extract_requirements(&self, _raw: &str) -> FabulaResult<BriefDraft> {
        not_scripted()
    }

    async fn generate_plot(&self, _brief: &Brief) -> FabulaResult<PlotStructure> {
        Ok(invalid_plot())
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

    async fn repair_output(
        &self,
        kind: &str,
        raw: &Value,
        violation: &str,
    ) -> FabulaResult<Value> {
        self.repair_calls.fetch_add(1, Ordering::SeqCst);
        *self.captured_violation.lock().unwrap() = Some(violation.to_string());
        match self.repair {
            RepairBehavior::Fix => Ok(serde_json::to_value(valid_plot()).unwrap()),
            RepairBehavior::StillBroken => Ok(raw.clone()),
            RepairBehavior::Decline => Err(CapabilityError::new(
                CapabilityErrorKind::RepairNotSupported(kind.to_string()),
            )
            .into()),
        }
    }
}

#[tokio::test]
async fn repair_pass_fixes_malformed_output() {
    let model = MalformedPlotModel::new(RepairBehavior::Fix);
    let repair_calls = Arc::clone(&model.repair_calls);
    let violation = Arc::clone(&model.captured_violation);
    let validated = Validated::new(model);

    let plot = validated.generate_plot(&sample_brief()).await.unwrap();
    assert_eq!(plot, valid_plot());
    assert_eq!(repair_calls.load(Ordering::SeqCst), 1);

    // The repair request names the specific validation violation.
    let captured = violation.lock().unwrap().clone().unwrap();
    assert!(captured.contains("beats"));
}

#[tokio::test]
async fn failed_repair_propagates_the_original_error() {
    let model = MalformedPlotModel::new(RepairBehavior::StillBroken);
    let repair_calls = Arc::clone(&model.repair_calls);
    let validated = Validated::new(model);

    let err = validated.generate_plot(&sample_brief()).await.unwrap_err();
    match err.kind() {
        FabulaErrorKind::Capability(c) => match &c.kind {
            CapabilityErrorKind::MalformedOutput { kind, .. } => assert_eq!(kind, "plot"),
            other => panic!("expected MalformedOutput, got {}", other),
        },
        other => panic!("expected capability error, got {}", other),
    }
    // Repair is attempted once, never looped.
    assert_eq!(repair_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn declined_repair_propagates_the_original_error() {
    let model = MalformedPlotModel::new(RepairBehavior::Decline);
    let validated = Validated::new(model);

    let err = validated.generate_plot(&sample_brief()).await.unwrap_err();
    assert!(format!("{}", err).contains("Malformed output"));
}

#[tokio::test]
async fn valid_output_passes_through_without_repair() {
    struct WellFormed;

    #[async_trait]
    impl StoryModel for WellFormed {
        async fn extract_requirements(&self, _raw: &str) -> FabulaResult<BriefDraft> {
            not_scripted()
        }
        async fn generate_plot(&self, _brief: &Brief) -> FabulaResult<PlotStructure> {
            Ok(valid_plot())
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
        async fn generate_prose_page(
            &self,
            _req: &ProsePageRequest<'_>,
        ) -> FabulaResult<ProsePage> {
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

    let validated = Validated::new(WellFormed);
    let plot = validated.generate_plot(&sample_brief()).await.unwrap();
    assert_eq!(plot, valid_plot());
}
