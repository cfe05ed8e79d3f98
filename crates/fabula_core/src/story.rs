//! The composed story record chain and its persisted artifact form.

use crate::{Brief, PlotStructure, Prose, VisualDirection};
use fabula_error::{FabulaResult, ResumeError, ResumeErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Brief ⊕ PlotStructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryWithPlot {
    /// The user's requirements
    pub brief: Brief,
    /// The narrative skeleton
    pub plot: PlotStructure,
}

impl StoryWithPlot {
    /// Compose a brief with its plot structure.
    pub fn compose(brief: Brief, plot: PlotStructure) -> Self {
        Self { brief, plot }
    }

    /// Number of pages this story will have.
    pub fn page_count(&self) -> u32 {
        self.brief.page_count
    }
}

/// StoryWithPlot ⊕ Prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryWithProse {
    /// The user's requirements
    pub brief: Brief,
    /// The narrative skeleton
    pub plot: PlotStructure,
    /// Story-wide voice and per-page text
    pub prose: Prose,
}

impl StoryWithProse {
    /// Compose a plotted story with its prose.
    pub fn compose(story: StoryWithPlot, prose: Prose) -> Self {
        Self {
            brief: story.brief,
            plot: story.plot,
            prose,
        }
    }

    /// Drop the prose field, recovering the earlier-stage record.
    pub fn without_prose(&self) -> StoryWithPlot {
        StoryWithPlot {
            brief: self.brief.clone(),
            plot: self.plot.clone(),
        }
    }

    /// Number of pages this story will have.
    pub fn page_count(&self) -> u32 {
        self.brief.page_count
    }
}

/// StoryWithProse ⊕ VisualDirection: the canonical full story record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedStory {
    /// The user's requirements
    pub brief: Brief,
    /// The narrative skeleton
    pub plot: PlotStructure,
    /// Story-wide voice and per-page text
    pub prose: Prose,
    /// Global style and per-page illustration beats
    pub visuals: VisualDirection,
}

impl ComposedStory {
    /// Compose a prose story with its visual direction.
    pub fn compose(story: StoryWithProse, visuals: VisualDirection) -> Self {
        Self {
            brief: story.brief,
            plot: story.plot,
            prose: story.prose,
            visuals,
        }
    }

    /// Drop the visuals field, recovering the earlier-stage record.
    pub fn without_visuals(&self) -> StoryWithProse {
        StoryWithProse {
            brief: self.brief.clone(),
            plot: self.plot.clone(),
            prose: self.prose.clone(),
        }
    }

    /// Number of pages this story will have.
    pub fn page_count(&self) -> u32 {
        self.brief.page_count
    }
}

/// The persisted form of a story artifact.
///
/// A `story.json` written by this pipeline always carries an explicit `kind`
/// discriminant. Older folders may hold untagged files, which are classified
/// by key presence; a file that cannot be unambiguously classified is an
/// error, never a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoryArtifact {
    /// Brief and plot only; the story has not passed the plot stage
    Draft(StoryWithPlot),
    /// Prose and visuals present (visuals possibly still partial)
    Composed(ComposedStory),
}

impl StoryArtifact {
    /// Classify and deserialize a persisted story value.
    ///
    /// Tagged values deserialize directly. Untagged legacy values are
    /// classified by key presence: both `prose` and `visuals` keys mean
    /// composed, neither means draft, and exactly one is ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeErrorKind::AmbiguousArtifact`] when classification is
    /// unsafe and [`ResumeErrorKind::CorruptArtifact`] when the value does
    /// not deserialize as the classified record.
    pub fn from_value(value: Value, artifact: &str) -> FabulaResult<Self> {
        let corrupt = |e: serde_json::Error| {
            ResumeError::new(ResumeErrorKind::CorruptArtifact {
                artifact: artifact.to_string(),
                message: e.to_string(),
            })
        };

        let object = value.as_object().ok_or_else(|| {
            ResumeError::new(ResumeErrorKind::CorruptArtifact {
                artifact: artifact.to_string(),
                message: "not a JSON object".to_string(),
            })
        })?;

        if object.contains_key("kind") {
            return Ok(serde_json::from_value(value).map_err(corrupt)?);
        }

        let has_prose = object.contains_key("prose");
        let has_visuals = object.contains_key("visuals");
        match (has_prose, has_visuals) {
            (true, true) => {
                tracing::debug!(artifact, "Classified untagged story artifact as composed");
                Ok(Self::Composed(
                    serde_json::from_value(value).map_err(corrupt)?,
                ))
            }
            (false, false) => {
                tracing::debug!(artifact, "Classified untagged story artifact as draft");
                Ok(Self::Draft(serde_json::from_value(value).map_err(corrupt)?))
            }
            (has_prose, _) => Err(ResumeError::new(ResumeErrorKind::AmbiguousArtifact {
                artifact: artifact.to_string(),
                message: format!(
                    "untagged story carries '{}' without '{}'",
                    if has_prose { "prose" } else { "visuals" },
                    if has_prose { "visuals" } else { "prose" },
                ),
            })
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AgeRange, ArtDirection, BeatPurpose, Character, PlotBeat, ProsePage, ProseSetup,
        SettingDefaults, VisualStyleGuide,
    };

    pub(crate) fn sample_brief() -> Brief {
        Brief::builder()
            .title("The Fog Lighthouse")
            .arc("A timid firefly learns her small light matters")
            .setting("A foggy harbor town")
            .age_range(AgeRange::new(4, 7))
            .page_count(8u32)
            .characters(vec![Character {
                name: "Fen".to_string(),
                description: "A timid firefly".to_string(),
            }])
            .build()
            .unwrap()
    }

    pub(crate) fn sample_plot() -> PlotStructure {
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

    fn sample_prose() -> Prose {
        Prose {
            setup: ProseSetup {
                logline: "A small light is still a light.".to_string(),
                theme: "Courage".to_string(),
                style_notes: None,
            },
            pages: vec![ProsePage {
                page_number: 1,
                summary: "Fen hides".to_string(),
                text: "Fen tucked her glow under a leaf.".to_string(),
                image_concept: "Firefly under a leaf".to_string(),
            }],
        }
    }

    fn sample_visuals() -> VisualDirection {
        VisualDirection {
            style_guide: VisualStyleGuide {
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
                mood: None,
                atmosphere: None,
            },
            illustrated_pages: vec![],
        }
    }

    #[test]
    fn tagged_artifact_round_trips() {
        let draft = StoryArtifact::Draft(StoryWithPlot::compose(sample_brief(), sample_plot()));
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["kind"], "draft");

        let parsed = StoryArtifact::from_value(value, "story.json").unwrap();
        assert_eq!(parsed, draft);
    }

    #[test]
    fn untagged_composed_classified_by_key_presence() {
        let composed = ComposedStory::compose(
            StoryWithProse::compose(
                StoryWithPlot::compose(sample_brief(), sample_plot()),
                sample_prose(),
            ),
            sample_visuals(),
        );
        let value = serde_json::to_value(&composed).unwrap();

        match StoryArtifact::from_value(value, "story.json").unwrap() {
            StoryArtifact::Composed(c) => assert_eq!(c, composed),
            other => panic!("expected composed, got {:?}", other),
        }
    }

    #[test]
    fn untagged_draft_classified_by_key_presence() {
        let draft = StoryWithPlot::compose(sample_brief(), sample_plot());
        let value = serde_json::to_value(&draft).unwrap();

        match StoryArtifact::from_value(value, "story.json").unwrap() {
            StoryArtifact::Draft(d) => assert_eq!(d, draft),
            other => panic!("expected draft, got {:?}", other),
        }
    }

    #[test]
    fn half_composed_artifact_is_ambiguous() {
        let mut value = serde_json::to_value(StoryWithPlot::compose(sample_brief(), sample_plot()))
            .unwrap();
        value["prose"] = serde_json::to_value(sample_prose()).unwrap();

        let err = StoryArtifact::from_value(value, "story.json").unwrap_err();
        assert!(format!("{}", err).contains("Ambiguous"));
    }
}
