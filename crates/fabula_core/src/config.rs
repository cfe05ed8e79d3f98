//! Pipeline configuration.
//!
//! Model selection, book format, and rate limits are process-wide concerns.
//! Rather than global state, they live in an explicit [`PipelineConfig`]
//! resolved once at startup (defaults overlaid with `FABULA_*` environment
//! variables) and passed down through the orchestrator.

use crate::BookFormat;
use fabula_error::{ConfigError, FabulaResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model identifiers per generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Requirements extraction model
    pub extraction: String,
    /// Plot generation model
    pub plot: String,
    /// Prose setup and per-page prose model
    pub prose: String,
    /// Style guide and visual beat model
    pub visuals: String,
    /// Page render (image) model
    pub render: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            extraction: "gemini-2.0-flash-lite".to_string(),
            plot: "gemini-2.0-flash".to_string(),
            prose: "gemini-2.0-flash".to_string(),
            visuals: "gemini-2.0-flash".to_string(),
            render: "imagen-3.0-generate-002".to_string(),
        }
    }
}

/// Resolved pipeline configuration.
///
/// # Environment overrides
///
/// Every field can be overridden with a `FABULA_`-prefixed variable using
/// `__` as the nesting separator, e.g. `FABULA_MODELS__PROSE`,
/// `FABULA_FORMAT`, `FABULA_REQUESTS_PER_MINUTE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model ids per capability
    pub models: ModelConfig,
    /// Sampling temperature for text generation
    pub temperature: f32,
    /// Book format passed to the render capability
    pub format: BookFormat,
    /// Root directory holding per-story artifact folders
    pub artifact_root: PathBuf,
    /// Capability-layer request rate limit
    pub requests_per_minute: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            temperature: 0.8,
            format: BookFormat::Square,
            artifact_root: PathBuf::from("stories"),
            requests_per_minute: 10,
        }
    }
}

impl PipelineConfig {
    /// Resolve configuration from defaults plus environment overrides.
    ///
    /// Resolution happens once at startup; the resulting struct is passed
    /// down explicitly rather than read from ambient state.
    ///
    /// # Errors
    ///
    /// Returns an error if an override fails to parse.
    #[tracing::instrument]
    pub fn resolve() -> FabulaResult<Self> {
        let resolved = config::Config::builder()
            .add_source(config::Environment::with_prefix("FABULA").separator("__"))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read environment: {}", e)))?
            .try_deserialize::<Self>()
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {}", e)))?;

        tracing::debug!(
            format = %resolved.format,
            requests_per_minute = resolved.requests_per_minute,
            "Resolved pipeline configuration"
        );
        Ok(resolved)
    }
}
