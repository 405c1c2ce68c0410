use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;

#[tokio::test]
async fn sqlite_set_get_remove_roundtrip() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.get("gtb-rad-session").await.unwrap(), None);

    store.set("gtb-rad-session", "{\"stats\":{}}").await.unwrap();
    assert_eq!(
        store.get("gtb-rad-session").await.unwrap().as_deref(),
        Some("{\"stats\":{}}")
    );

    store.remove("gtb-rad-session").await.unwrap();
    assert_eq!(store.get("gtb-rad-session").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_set_overwrites_existing_value() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    store.set("k", "first").await.unwrap();
    store.set("k", "second").await.unwrap();
    store.set("other", "untouched").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    assert_eq!(store.get("other").await.unwrap().as_deref(), Some("untouched"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.set("k", "v").await.unwrap();
    store.migrate().await.expect("second migrate");

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_builds_migrated_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.set("session", "{}").await.unwrap();
    assert_eq!(storage.kv.get("session").await.unwrap().as_deref(), Some("{}"));
}
