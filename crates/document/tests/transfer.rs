use shoplist_document::{CancellationToken, Document, DocumentError, DocumentStore};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

fn store_in(tmp: &TempDir) -> DocumentStore {
    DocumentStore::new(tmp.path().join("data").join("ShoppingList.json"))
}

fn sibling_count(store: &DocumentStore) -> usize {
    std::fs::read_dir(store.path().parent().unwrap())
        .unwrap()
        .count()
}

#[tokio::test]
async fn import_replaces_whole_document() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();

    let incoming = br#"{"Categories":["Bakery"],"Units":[],"Stores":[],"Products":[]}"#;
    let mut reader = &incoming[..];
    let copied = store
        .replace_with(&mut reader, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(copied, incoming.len() as u64);
    assert_eq!(std::fs::read(store.path()).unwrap(), incoming);
    assert_eq!(sibling_count(&store), 1);
}

#[tokio::test]
async fn import_creates_missing_data_directory() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);

    let mut reader = &b"{}"[..];
    store
        .replace_with(&mut reader, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(store.load().unwrap(), Some(Document::empty()));
}

#[tokio::test]
async fn cancelled_import_leaves_destination_untouched() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();
    let before = std::fs::read(store.path()).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut reader = &b"{\"Products\": []}"[..];
    let err = store.replace_with(&mut reader, &cancel).await.unwrap_err();

    assert!(err.is_cancelled(), "unexpected error: {err:?}");
    assert_eq!(std::fs::read(store.path()).unwrap(), before);
    assert_eq!(sibling_count(&store), 1, "temp file must be removed");
}

#[tokio::test]
async fn cancellation_interrupts_a_stalled_import() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();
    let before = std::fs::read(store.path()).unwrap();

    // The writer half stays open, so the reader stalls after the first chunk.
    let (mut reader, mut writer) = tokio::io::duplex(64);
    writer.write_all(b"{\"Categories\":").await.unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        store.replace_with(&mut reader, &cancel),
    )
    .await
    .expect("import should stop promptly")
    .unwrap_err();

    match err {
        DocumentError::Cancelled { bytes_copied } => assert_eq!(bytes_copied, 14),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(std::fs::read(store.path()).unwrap(), before);
    assert_eq!(sibling_count(&store), 1);
    drop(writer);
}

#[tokio::test]
async fn export_creates_seeded_document_when_missing() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);

    let mut out = Vec::new();
    let copied = store
        .export_to(&mut out, &CancellationToken::new())
        .await
        .unwrap();

    assert!(store.exists());
    assert_eq!(copied, out.len() as u64);
    assert_eq!(Document::from_slice(&out).unwrap(), Document::seeded());
}

#[tokio::test]
async fn export_streams_corrupt_document_verbatim() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), b"not a document").unwrap();

    let mut out = Vec::new();
    store
        .export_to(&mut out, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out, b"not a document");
}

#[tokio::test]
async fn cancelled_export_reports_cancellation() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut out = Vec::new();
    let err = store.export_to(&mut out, &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(out.is_empty());
}

#[tokio::test]
async fn export_onto_the_document_itself_keeps_it_intact() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();
    let before = std::fs::read(store.path()).unwrap();

    let copied = store
        .export_to_path(store.path(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(copied, before.len() as u64);
    assert_eq!(std::fs::read(store.path()).unwrap(), before);
    assert_eq!(store.load().unwrap(), Some(Document::seeded()));
    assert_eq!(sibling_count(&store), 1);
}

#[tokio::test]
async fn export_to_path_creates_directories_and_replaces_target() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();
    let target = tmp.path().join("backup").join("list.json");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, b"stale backup that is longer than nothing").unwrap();

    store
        .export_to_path(&target, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read(&target).unwrap(),
        std::fs::read(store.path()).unwrap()
    );
}

#[tokio::test]
async fn cancelled_export_to_path_leaves_target_untouched() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.load_or_create().unwrap();
    let backup_dir = tmp.path().join("backup");
    let target = backup_dir.join("list.json");
    std::fs::create_dir_all(&backup_dir).unwrap();
    std::fs::write(&target, b"previous backup").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = store.export_to_path(&target, &cancel).await.unwrap_err();

    assert!(err.is_cancelled(), "unexpected error: {err:?}");
    assert_eq!(std::fs::read(&target).unwrap(), b"previous backup");
    assert_eq!(std::fs::read_dir(&backup_dir).unwrap().count(), 1);
}
