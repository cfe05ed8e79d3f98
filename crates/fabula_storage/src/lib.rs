//! Artifact persistence for Fabula story folders.
//!
//! Each story lives in its own folder holding one JSON document per artifact
//! kind. Artifacts are the pipeline's checkpoints: they are written after
//! every stage transition and every completed page, and the resume detector
//! reads them back to re-enter the pipeline at the right point.
//!
//! # Example
//!
//! ```rust
//! use fabula_storage::{ArtifactKind, ArtifactStore, FileSystemStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemStore::new("/tmp/stories/the-fog-lighthouse")?;
//!
//! store.save(ArtifactKind::Brief, &json!({ "title": "The Fog Lighthouse" })).await?;
//!
//! let brief = store.load(ArtifactKind::Brief).await?;
//! assert!(brief.is_some());
//! assert!(store.load(ArtifactKind::Book).await?.is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use fabula_error::{FabulaResult, JsonError, StorageError, StorageErrorKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

mod filesystem;

pub use filesystem::FileSystemStore;

/// The recognized artifact kinds, one JSON file each per story folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// The user's requirements
    Brief,
    /// The narrative skeleton
    Plot,
    /// Story-wide voice plus per-page text
    Prose,
    /// The composed story record (draft or composed)
    Story,
    /// The final rendered book
    Book,
}

impl ArtifactKind {
    /// All kinds in stage order.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Brief,
        ArtifactKind::Plot,
        ArtifactKind::Prose,
        ArtifactKind::Story,
        ArtifactKind::Book,
    ];

    /// Stable filename for this kind.
    pub fn filename(self) -> &'static str {
        match self {
            ArtifactKind::Brief => "brief.json",
            ArtifactKind::Plot => "plot.json",
            ArtifactKind::Prose => "prose.json",
            ArtifactKind::Story => "story.json",
            ArtifactKind::Book => "book.json",
        }
    }

    /// Legacy filename accepted on load, if any.
    ///
    /// Older folders persisted the plot under `blurb.json`.
    pub fn legacy_filename(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Plot => Some("blurb.json"),
            _ => None,
        }
    }

    /// Parse a filename back to a kind, accepting legacy names.
    pub fn from_filename(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.filename() == name || kind.legacy_filename() == Some(name))
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactKind::Brief => "brief",
            ArtifactKind::Plot => "plot",
            ArtifactKind::Prose => "prose",
            ArtifactKind::Story => "story",
            ArtifactKind::Book => "book",
        };
        write!(f, "{}", name)
    }
}

/// Trait for pluggable artifact persistence backends.
///
/// A single story folder must never be written by two pipeline instances at
/// once; the design assumes single-writer-per-folder.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist an artifact, replacing any previous version of the same kind.
    async fn save(&self, kind: ArtifactKind, data: &Value) -> FabulaResult<()>;

    /// Load an artifact, or `None` if it has never been persisted.
    async fn load(&self, kind: ArtifactKind) -> FabulaResult<Option<Value>>;

    /// List the artifact kinds present in this story folder.
    async fn list(&self) -> FabulaResult<Vec<ArtifactKind>>;

    /// The path an artifact of this kind is (or would be) stored at.
    fn path_for(&self, kind: ArtifactKind) -> PathBuf;
}

/// Persist a typed artifact.
pub async fn save_json<T: Serialize + Sync>(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
    data: &T,
) -> FabulaResult<()> {
    let value = serde_json::to_value(data)
        .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", kind, e)))?;
    store.save(kind, &value).await
}

/// Load a typed artifact, or `None` if absent.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
) -> FabulaResult<Option<T>> {
    match store.load(kind).await? {
        Some(value) => {
            let parsed = serde_json::from_value(value)
                .map_err(|e| JsonError::new(format!("Failed to parse {}: {}", kind, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Load a typed artifact, failing if absent.
pub async fn require_json<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
) -> FabulaResult<T> {
    load_json(store, kind).await?.ok_or_else(|| {
        StorageError::new(StorageErrorKind::NotFound(kind.filename().to_string())).into()
    })
}
