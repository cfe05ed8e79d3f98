//! Shared fixtures and a scripted capability mock for pipeline tests.
#![allow(dead_code)]

use async_trait::async_trait;
use fabula_core::{
    AgeRange, ArtDirection, BeatPurpose, Brief, BriefDraft, Character, CharacterPlacement,
    FocusTier, IllustratedPage, IllustrationBeat, ImageRef, PlotBeat, PlotStructure, ProsePage,
    ProseSetup, RenderedPage, SettingDefaults, ShotAngle, ShotComposition, ShotSize,
    StoryWithPlot, VisualStyleGuide,
};
use fabula_error::{CapabilityError, CapabilityErrorKind, FabulaResult};
use fabula_interface::{ProsePageRequest, RenderPageRequest, StoryModel, VisualBeatsRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn sample_brief(page_count: u32) -> Brief {
    Brief::builder()
        .title("The Fog Lighthouse")
        .arc("A timid firefly learns her small light matters")
        .setting("A foggy harbor town")
        .age_range(AgeRange::new(4, 7))
        .page_count(page_count)
        .characters(vec![Character {
            name: "Fen".to_string(),
            description: "A timid firefly".to_string(),
        }])
        .build()
        .unwrap()
}

pub fn sample_plot() -> PlotStructure {
    PlotStructure {
        summary: "Fen the firefly saves the harbor on the foggiest night.".to_string(),
        beats: vec![
            PlotBeat {
                purpose: BeatPurpose::Setup,
                description: "Fen hides her dim light.".to_string(),
            },
            PlotBeat {
                purpose: BeatPurpose::Conflict,
                description: "Fog swallows the lighthouse.".to_string(),
            },
            PlotBeat {
                purpose: BeatPurpose::Climax,
                description: "Fen flies into the fog.".to_string(),
            },
            PlotBeat {
                purpose: BeatPurpose::Resolution,
                description: "The boats follow her glow home.".to_string(),
            },
        ],
    }
}

pub fn sample_story(page_count: u32) -> StoryWithPlot {
    StoryWithPlot::compose(sample_brief(page_count), sample_plot())
}

pub fn scripted_prose_page(page_number: u32) -> ProsePage {
    ProsePage {
        page_number,
        summary: format!("Summary of page {}", page_number),
        text: format!("The text of page {}.", page_number),
        image_concept: format!("Concept for page {}", page_number),
    }
}

pub fn scripted_illustrated_page(page_number: u32) -> IllustratedPage {
    IllustratedPage {
        page_number,
        beats: vec![IllustrationBeat {
            order: 1,
            purpose: BeatPurpose::Setup,
            summary: format!("Beat for page {}", page_number),
            emotion: "wonder".to_string(),
            characters: vec![CharacterPlacement {
                character: "Fen".to_string(),
                expression: "wide-eyed".to_string(),
                pose: "hovering".to_string(),
                focus: FocusTier::Primary,
            }],
            shot: ShotComposition {
                size: ShotSize::Wide,
                angle: ShotAngle::EyeLevel,
                overrides: None,
            },
            setting_override: None,
        }],
    }
}

pub fn scripted_style_guide() -> VisualStyleGuide {
    VisualStyleGuide {
        art_direction: ArtDirection {
            genre: "storybook watercolor".to_string(),
            medium: "gouache".to_string(),
            technique: None,
        },
        setting: SettingDefaults {
            location: "harbor".to_string(),
            time_of_day: Some("night".to_string()),
            weather: Some("fog".to_string()),
        },
        lighting: None,
        color_palette: None,
        mood: Some("hushed".to_string()),
        atmosphere: None,
    }
}

pub fn scripted_setup() -> ProseSetup {
    ProseSetup {
        logline: "A small light is still a light.".to_string(),
        theme: "Courage".to_string(),
        style_notes: None,
    }
}

/// Where to inject a scripted failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    ProsePage(u32),
    VisualsPage(u32),
    RenderPage(u32),
}

/// Deterministic capability mock.
///
/// Counts calls per capability and captures the prior-page numbers passed to
/// every per-page call, so tests can assert exact context threading.
#[derive(Default)]
pub struct ScriptedModel {
    pub fail_at: Option<FailAt>,
    pub setup_calls: AtomicUsize,
    pub style_calls: AtomicUsize,
    pub prose_calls: AtomicUsize,
    pub visuals_calls: AtomicUsize,
    pub render_calls: AtomicUsize,
    pub prose_priors: Mutex<Vec<Vec<u32>>>,
    pub visuals_priors: Mutex<Vec<Vec<u32>>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_at(fail_at: FailAt) -> Arc<Self> {
        Arc::new(Self {
            fail_at: Some(fail_at),
            ..Self::default()
        })
    }
}

fn scripted_failure(what: &str) -> CapabilityError {
    CapabilityError::new(CapabilityErrorKind::Provider(format!(
        "scripted failure: {}",
        what
    )))
}

#[async_trait]
impl StoryModel for ScriptedModel {
    async fn extract_requirements(&self, _raw: &str) -> FabulaResult<BriefDraft> {
        Ok(BriefDraft::default())
    }

    async fn generate_plot(&self, _brief: &Brief) -> FabulaResult<PlotStructure> {
        Ok(sample_plot())
    }

    async fn generate_style_guide(
        &self,
        _story: &StoryWithPlot,
    ) -> FabulaResult<VisualStyleGuide> {
        self.style_calls.fetch_add(1, Ordering::SeqCst);
        Ok(scripted_style_guide())
    }

    async fn generate_prose_setup(&self, _story: &StoryWithPlot) -> FabulaResult<ProseSetup> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(scripted_setup())
    }

    async fn generate_prose_page(&self, req: &ProsePageRequest<'_>) -> FabulaResult<ProsePage> {
        self.prose_calls.fetch_add(1, Ordering::SeqCst);
        self.prose_priors
            .lock()
            .unwrap()
            .push(req.prior_pages.iter().map(|p| p.page_number).collect());
        if self.fail_at == Some(FailAt::ProsePage(req.page_number)) {
            return Err(scripted_failure("prose").into());
        }
        Ok(scripted_prose_page(req.page_number))
    }

    async fn generate_visual_beats(
        &self,
        req: &VisualBeatsRequest<'_>,
    ) -> FabulaResult<IllustratedPage> {
        self.visuals_calls.fetch_add(1, Ordering::SeqCst);
        self.visuals_priors
            .lock()
            .unwrap()
            .push(req.prior_pages.iter().map(|p| p.page_number).collect());
        if self.fail_at == Some(FailAt::VisualsPage(req.page_number)) {
            return Err(scripted_failure("visuals").into());
        }
        Ok(scripted_illustrated_page(req.page_number))
    }

    async fn render_page(&self, req: &RenderPageRequest<'_>) -> FabulaResult<RenderedPage> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(FailAt::RenderPage(req.page_number)) {
            return Err(scripted_failure("render").into());
        }
        Ok(RenderedPage {
            page_number: req.page_number,
            image: ImageRef::Url(format!(
                "https://images.example/fog-lighthouse/{}.png",
                req.page_number
            )),
        })
    }
}
