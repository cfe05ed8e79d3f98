//! Shared fixtures for capability wrapper tests.

use fabula_core::{AgeRange, BeatPurpose, Brief, Character, PlotBeat, PlotStructure};

pub fn sample_brief() -> Brief {
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

pub fn valid_plot() -> PlotStructure {
    PlotStructure {
        summary: "Fen saves the harbor on the foggiest night.".to_string(),
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

/// A plot with too few beats; fails schema validation.
pub fn invalid_plot() -> PlotStructure {
    PlotStructure {
        summary: "Too thin.".to_string(),
        beats: vec![
            PlotBeat {
                purpose: BeatPurpose::Setup,
                description: "Fen hides.".to_string(),
            },
            PlotBeat {
                purpose: BeatPurpose::Resolution,
                description: "Fen glows.".to_string(),
            },
        ],
    }
}
