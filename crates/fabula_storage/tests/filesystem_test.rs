//! Integration tests for the filesystem artifact store.

use fabula_storage::{load_json, save_json, ArtifactKind, ArtifactStore, FileSystemStore};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(dir.path().join("story")).unwrap();

    let brief = json!({
        "title": "The Fog Lighthouse",
        "page_count": 8,
    });
    store.save(ArtifactKind::Brief, &brief).await.unwrap();

    let loaded = store.load(ArtifactKind::Brief).await.unwrap().unwrap();
    assert_eq!(loaded, brief);
}

#[tokio::test]
async fn missing_artifacts_load_as_none() {
    let dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(dir.path().join("story")).unwrap();

    assert!(store.load(ArtifactKind::Book).await.unwrap().is_none());
}

#[tokio::test]
async fn save_replaces_the_previous_version() {
    let dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(dir.path().join("story")).unwrap();

    store
        .save(ArtifactKind::Prose, &json!({ "pages": [] }))
        .await
        .unwrap();
    store
        .save(ArtifactKind::Prose, &json!({ "pages": [{ "page_number": 1 }] }))
        .await
        .unwrap();

    let loaded = store.load(ArtifactKind::Prose).await.unwrap().unwrap();
    assert_eq!(loaded["pages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_reports_present_kinds_in_stage_order() {
    let dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(dir.path().join("story")).unwrap();

    store.save(ArtifactKind::Plot, &json!({})).await.unwrap();
    store.save(ArtifactKind::Brief, &json!({})).await.unwrap();

    let kinds = store.list().await.unwrap();
    assert_eq!(kinds, vec![ArtifactKind::Brief, ArtifactKind::Plot]);
}

#[tokio::test]
async fn legacy_blurb_file_loads_as_plot() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("story");
    let store = FileSystemStore::new(&folder).unwrap();

    let plot = json!({ "summary": "Fen saves the harbor.", "beats": [] });
    tokio::fs::write(folder.join("blurb.json"), plot.to_string())
        .await
        .unwrap();

    let loaded = store.load(ArtifactKind::Plot).await.unwrap().unwrap();
    assert_eq!(loaded, plot);

    let kinds = store.list().await.unwrap();
    assert_eq!(kinds, vec![ArtifactKind::Plot]);
}

#[tokio::test]
async fn plot_json_wins_over_legacy_blurb() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("story");
    let store = FileSystemStore::new(&folder).unwrap();

    tokio::fs::write(folder.join("blurb.json"), r#"{"which":"legacy"}"#)
        .await
        .unwrap();
    store
        .save(ArtifactKind::Plot, &json!({ "which": "current" }))
        .await
        .unwrap();

    let loaded = store.load(ArtifactKind::Plot).await.unwrap().unwrap();
    assert_eq!(loaded["which"], "current");
}

#[tokio::test]
async fn corrupt_artifacts_fail_loudly() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("story");
    let store = FileSystemStore::new(&folder).unwrap();

    tokio::fs::write(folder.join("prose.json"), "not json {")
        .await
        .unwrap();

    assert!(store.load(ArtifactKind::Prose).await.is_err());
}

#[tokio::test]
async fn typed_helpers_round_trip() {
    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Note {
        text: String,
    }

    let dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(dir.path().join("story")).unwrap();

    let note = Note {
        text: "low tide at dusk".to_string(),
    };
    save_json(&store, ArtifactKind::Brief, &note).await.unwrap();

    let loaded: Note = load_json(&store, ArtifactKind::Brief)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded, note);
}

#[tokio::test]
async fn separate_story_folders_do_not_interfere() {
    let dir = TempDir::new().unwrap();
    let a = FileSystemStore::new(dir.path().join("a")).unwrap();
    let b = FileSystemStore::new(dir.path().join("b")).unwrap();

    a.save(ArtifactKind::Brief, &json!({ "title": "A" }))
        .await
        .unwrap();
    b.save(ArtifactKind::Brief, &json!({ "title": "B" }))
        .await
        .unwrap();

    let loaded_a = a.load(ArtifactKind::Brief).await.unwrap().unwrap();
    let loaded_b = b.load(ArtifactKind::Brief).await.unwrap().unwrap();
    assert_eq!(loaded_a["title"], "A");
    assert_eq!(loaded_b["title"], "B");
}
