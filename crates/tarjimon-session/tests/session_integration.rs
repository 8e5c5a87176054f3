use tarjimon_core::{Direction, Modality};
use tarjimon_session::{FileSessionStore, SessionStore, Stage, UserSession};

/// Helper: create a FileSessionStore in a temp directory.
async fn temp_store() -> (FileSessionStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileSessionStore::open(tmp.path().join("sessions.json"))
        .await
        .unwrap();
    (store, tmp)
}

#[tokio::test]
async fn test_set_and_get_session() {
    let (store, _tmp) = temp_store().await;

    let session = UserSession::with_mode(Modality::Text);
    store.set(7, session.clone()).await.unwrap();

    let loaded = store.get(7).await.unwrap();
    assert_eq!(loaded.mode, Some(Modality::Text));
    assert!(loaded.direction.is_none());
}

#[tokio::test]
async fn test_get_nonexistent_returns_none() {
    let (store, _tmp) = temp_store().await;
    assert!(store.get(404).await.is_none());
}

#[tokio::test]
async fn test_delete_nonexistent_is_noop() {
    let (store, _tmp) = temp_store().await;
    // Clearing a session that does not exist must not error
    store.delete(404).await.unwrap();
}

#[tokio::test]
async fn test_delete_removes_session() {
    let (store, _tmp) = temp_store().await;

    store
        .set(1, UserSession::with_mode(Modality::Photo))
        .await
        .unwrap();
    assert!(store.get(1).await.is_some());

    store.delete(1).await.unwrap();
    assert!(store.get(1).await.is_none());
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("sessions.json");

    {
        let store = FileSessionStore::open(&path).await.unwrap();
        let mut session = UserSession::with_mode(Modality::Voice);
        session.select_direction(Direction::new("uz", "ru"));
        store.set(42, session).await.unwrap();
    }

    // A fresh store instance must see the persisted session
    let store = FileSessionStore::open(&path).await.unwrap();
    let loaded = store.get(42).await.unwrap();
    assert_eq!(loaded.mode, Some(Modality::Voice));
    assert_eq!(loaded.direction, Some(Direction::new("uz", "ru")));
    assert_eq!(loaded.stage(), Some(Stage::DirectionSelected));
}

#[tokio::test]
async fn test_corrupt_snapshot_degrades_to_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("sessions.json");
    tokio::fs::write(&path, "not json at all").await.unwrap();

    let store = FileSessionStore::open(&path).await.unwrap();
    assert!(store.load_all().await.is_empty());
}

#[tokio::test]
async fn test_unknown_version_degrades_to_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("sessions.json");
    tokio::fs::write(&path, r#"{"version": 99, "sessions": {}}"#)
        .await
        .unwrap();

    let store = FileSessionStore::open(&path).await.unwrap();
    assert!(store.load_all().await.is_empty());
}

#[tokio::test]
async fn test_load_all_snapshots_every_session() {
    let (store, _tmp) = temp_store().await;

    store
        .set(1, UserSession::with_mode(Modality::Text))
        .await
        .unwrap();
    store
        .set(2, UserSession::with_mode(Modality::Video))
        .await
        .unwrap();

    let all = store.load_all().await;
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|(id, _)| *id == 1));
    assert!(all.iter().any(|(id, _)| *id == 2));
}

#[tokio::test]
async fn test_set_overwrites_existing() {
    let (store, _tmp) = temp_store().await;

    store
        .set(5, UserSession::with_mode(Modality::Text))
        .await
        .unwrap();

    let mut replacement = UserSession::with_mode(Modality::Photo);
    replacement.select_direction(Direction::new("en", "uz"));
    store.set(5, replacement).await.unwrap();

    let loaded = store.get(5).await.unwrap();
    assert_eq!(loaded.mode, Some(Modality::Photo));
    assert_eq!(loaded.direction, Some(Direction::new("en", "uz")));
}

#[tokio::test]
async fn test_no_tmp_file_left_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("sessions.json");
    let store = FileSessionStore::open(&path).await.unwrap();

    store
        .set(9, UserSession::with_mode(Modality::Voice))
        .await
        .unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}
