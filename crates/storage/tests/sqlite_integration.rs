use std::sync::Arc;

use lotus_core::model::{Card, CardId, Deck, DeckId, Document};
use lotus_core::time::fixed_now;
use storage::repository::SnapshotRepository;
use storage::sqlite::SqliteRepository;
use storage::{DocumentPersistence, LoadOutcome, STORAGE_KEY, Storage};

fn build_document() -> Document {
    let mut doc = Document::new();
    let deck = Deck::new(DeckId::generate(), "Spanish", fixed_now()).unwrap();
    doc.add_deck(deck).unwrap();
    for (front, back) in [("hola", "hello"), ("adiós", "goodbye")] {
        let card = Card::new(CardId::generate(), front, back, fixed_now()).unwrap();
        doc.add_card_to_active(card).unwrap();
    }
    doc
}

#[tokio::test]
async fn sqlite_snapshot_round_trip() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshot_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    let persistence = DocumentPersistence::from_storage(&storage);

    assert_eq!(persistence.load().await, LoadOutcome::NotFound);

    let doc = build_document();
    persistence.save(&doc).await.expect("save");
    assert_eq!(persistence.load().await, LoadOutcome::Loaded(doc));
}

#[tokio::test]
async fn sqlite_write_replaces_previous_snapshot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.write(STORAGE_KEY, "first").await.unwrap();
    repo.write(STORAGE_KEY, "second").await.unwrap();
    assert_eq!(
        repo.read(STORAGE_KEY).await.unwrap().as_deref(),
        Some("second")
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snapshots")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn corrupt_sqlite_snapshot_loads_as_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_snapshot_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.write(STORAGE_KEY, "null").await.unwrap();

    let persistence = DocumentPersistence::new(Arc::new(repo));
    assert_eq!(persistence.load().await, LoadOutcome::NotFound);
}
