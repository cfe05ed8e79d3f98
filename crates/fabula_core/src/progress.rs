//! The typed progress event surface.
//!
//! The pipeline reports progress through a single closed event type delivered
//! to a [`ProgressSink`]. Consumers (logging, UIs, tests) subscribe without
//! coupling to pipeline internals, and cannot depend on undocumented call
//! patterns: the step and status sets below are the whole surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

/// A pipeline step that reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "step", content = "page")]
pub enum ProgressStep {
    /// Prose setup + style guide generation
    Setup,
    /// Style guide generation
    StyleGuide,
    /// Prose generation for one page
    ProsePage(u32),
    /// Visual beat generation for one page
    VisualsPage(u32),
    /// Rendering of one page
    RenderPage(u32),
    /// The terminal completion marker
    Complete,
}

impl std::fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressStep::Setup => write!(f, "setup"),
            ProgressStep::StyleGuide => write!(f, "style-guide"),
            ProgressStep::ProsePage(n) => write!(f, "prose-page-{}", n),
            ProgressStep::VisualsPage(n) => write!(f, "visuals-page-{}", n),
            ProgressStep::RenderPage(n) => write!(f, "render-page-{}", n),
            ProgressStep::Complete => write!(f, "complete"),
        }
    }
}

/// Status of a progress event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressStatus {
    /// The step has begun
    Start,
    /// The step finished successfully
    Complete,
    /// The step failed
    Error,
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Which step this event concerns
    pub step: ProgressStep,
    /// Start, complete, or error
    pub status: ProgressStatus,
    /// Optional event detail (page number, artifact path, error message)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ProgressEvent {
    /// Create an event with no payload.
    pub fn new(step: ProgressStep, status: ProgressStatus) -> Self {
        Self {
            step,
            status,
            payload: None,
        }
    }

    /// Attach a payload to the event.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Consumer of progress events.
pub trait ProgressSink: Send + Sync {
    /// Receive one event. Must not block.
    fn emit(&self, event: ProgressEvent);
}

/// Sink that drops all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Sink that logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match event.status {
            ProgressStatus::Error => tracing::warn!(
                step = %event.step,
                status = %event.status,
                payload = ?event.payload,
                "Pipeline progress"
            ),
            _ => tracing::info!(
                step = %event.step,
                status = %event.status,
                "Pipeline progress"
            ),
        }
    }
}

/// Sink that forwards events into a tokio channel.
///
/// Sends never block; if the receiver is gone the event is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}
