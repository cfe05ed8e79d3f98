//! Filesystem-based artifact storage implementation.
//!
//! Stores each story's artifacts as pretty-printed JSON files inside a single
//! story folder. Writes go through a temp file plus rename so a crash mid-write
//! never leaves a half-written artifact for the resume detector to trip over.

use crate::{ArtifactKind, ArtifactStore};
use fabula_error::{FabulaResult, JsonError, StorageError, StorageErrorKind};
use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

/// Filesystem storage backend for one story folder.
///
/// # Example Structure
///
/// ```text
/// /var/fabula/stories/the-fog-lighthouse-1f2e3d4c/
/// ├── brief.json
/// ├── plot.json
/// ├── prose.json
/// ├── story.json
/// └── book.json
/// ```
pub struct FileSystemStore {
    folder: PathBuf,
}

impl FileSystemStore {
    /// Create a filesystem store rooted at the given story folder.
    ///
    /// Creates the folder if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the folder cannot be created or accessed.
    #[tracing::instrument(skip(folder))]
    pub fn new(folder: impl Into<PathBuf>) -> FabulaResult<Self> {
        let folder = folder.into();

        std::fs::create_dir_all(&folder).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                folder.display(),
                e
            )))
        })?;

        tracing::info!(path = %folder.display(), "Opened story folder");
        Ok(Self { folder })
    }

    /// Create a fresh story folder named after the title, under a parent
    /// directory.
    ///
    /// The folder name is the slugified title plus a short unique suffix, so
    /// two stories with the same title never collide.
    #[tracing::instrument(skip(parent))]
    pub fn create_for_title(parent: impl Into<PathBuf>, title: &str) -> FabulaResult<Self> {
        let folder = parent.into().join(story_folder_name(title));
        Self::new(folder)
    }

    /// The story folder this store reads and writes.
    pub fn folder(&self) -> &std::path::Path {
        &self.folder
    }
}

/// Build a filesystem-safe folder name from a story title.
///
/// Lowercases, replaces non-alphanumeric runs with single hyphens, and
/// appends the first segment of a fresh UUID.
pub fn story_folder_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("story");
    }

    let id = Uuid::new_v4().to_string();
    let suffix = id.split('-').next().unwrap_or("0");
    format!("{}-{}", slug, suffix)
}

#[async_trait::async_trait]
impl ArtifactStore for FileSystemStore {
    #[tracing::instrument(skip(self, data), fields(kind = %kind))]
    async fn save(&self, kind: ArtifactKind, data: &Value) -> FabulaResult<()> {
        let path = self.path_for(kind);

        let bytes = serde_json::to_vec_pretty(data)
            .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", kind, e)))?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(
            path = %path.display(),
            size = bytes.len(),
            "Saved artifact"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(kind = %kind))]
    async fn load(&self, kind: ArtifactKind) -> FabulaResult<Option<Value>> {
        let mut path = self.path_for(kind);

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            match kind.legacy_filename() {
                Some(legacy) => {
                    let legacy_path = self.folder.join(legacy);
                    if !tokio::fs::try_exists(&legacy_path).await.unwrap_or(false) {
                        return Ok(None);
                    }
                    tracing::debug!(path = %legacy_path.display(), "Reading legacy artifact");
                    path = legacy_path;
                }
                None => return Ok(None),
            }
        }

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            path = %path.display(),
            size = bytes.len(),
            "Loaded artifact"
        );

        Ok(Some(value))
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> FabulaResult<Vec<ArtifactKind>> {
        let mut entries = tokio::fs::read_dir(&self.folder).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.folder.display(),
                e
            )))
        })?;

        let mut kinds = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.folder.display(),
                e
            )))
        })? {
            let name = entry.file_name();
            if let Some(kind) = name.to_str().and_then(ArtifactKind::from_filename) {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }

        kinds.sort();
        Ok(kinds)
    }

    fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.folder.join(kind.filename())
    }
}
