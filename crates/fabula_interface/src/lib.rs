//! Generation capability traits for the Fabula pipeline.
//!
//! The pipeline core treats every generation operation (plot, prose, visual
//! beats, rendering) as an opaque asynchronous capability behind the
//! [`StoryModel`] trait. Concrete providers implement the trait; the pipeline
//! never sees a provider directly.
//!
//! Two stacking wrappers handle the capability-layer error policy so the
//! orchestrator never retries anything itself:
//!
//! - [`Governed`] - acquires a rate-limit permit before each call and honors
//!   a provider's retry-after signal with exactly one retry.
//! - [`Validated`] - runs schema validation on each typed output and gives
//!   the model one best-effort repair pass before surfacing the violation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod governed;
mod limiter;
mod traits;
mod types;
mod validated;

pub use governed::Governed;
pub use limiter::RequestLimiter;
pub use traits::StoryModel;
pub use types::{ProsePageRequest, RenderPageRequest, VisualBeatsRequest};
pub use validated::Validated;
