use lotus_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::app_services::open_sqlite;
use services::seed::DEMO_DECK_NAME;
use services::{IgnoredReason, MutationOutcome};

#[tokio::test]
async fn fresh_database_is_seeded_and_survives_restart() {
    let url = "sqlite:file:memdb_study_seed?mode=memory&cache=shared";
    let study = open_sqlite(url, fixed_clock()).await.expect("open sqlite");

    let doc = study.document();
    assert_eq!(doc.decks().len(), 1);
    assert_eq!(doc.decks()[0].name(), DEMO_DECK_NAME);
    assert_eq!(doc.active_cards().len(), 5);
    assert_eq!(doc.active_deck_id(), Some(doc.decks()[0].id()));

    let reopened = open_sqlite(url, fixed_clock()).await.expect("reopen sqlite");
    assert_eq!(reopened.document(), study.document());
}

#[tokio::test]
async fn study_session_over_sqlite() {
    let url = "sqlite:file:memdb_study_session?mode=memory&cache=shared";
    let mut study = open_sqlite(url, fixed_clock()).await.expect("open sqlite");

    assert_eq!(
        study.create_deck("Spanish").await.unwrap(),
        MutationOutcome::Applied
    );
    assert!(study.view().is_empty());
    assert_eq!(study.session().active_card_index(), 0);

    for (front, back) in [("hola", "hello"), ("gato", "cat"), ("perro", "dog")] {
        study.create_card(front, back).await.unwrap();
    }
    assert_eq!(
        study.create_card("solo", "  ").await.unwrap(),
        MutationOutcome::Ignored(IgnoredReason::EmptyBack)
    );

    study.shuffle_with(&mut StdRng::seed_from_u64(8));
    let shuffled: Vec<String> = study
        .view()
        .cards()
        .iter()
        .map(|card| card.front().to_owned())
        .collect();
    assert_eq!(shuffled.len(), 3);

    study.next();
    study.flip();
    assert!(study.session().is_flipped());

    let reopened = open_sqlite(url, fixed_clock()).await.expect("reopen sqlite");
    assert_eq!(reopened.document(), study.document());
    assert_eq!(reopened.session().session_order(), None);
    assert!(!reopened.session().is_flipped());
    let stored: Vec<&str> = reopened
        .document()
        .active_cards()
        .iter()
        .map(|card| card.front())
        .collect();
    assert_eq!(stored, vec!["hola", "gato", "perro"]);
}

#[tokio::test]
async fn deleting_every_deck_leaves_empty_document() {
    let url = "sqlite:file:memdb_study_delete?mode=memory&cache=shared";
    let mut study = open_sqlite(url, fixed_clock()).await.expect("open sqlite");

    assert_eq!(
        study.delete_active_deck(|_| true).await.unwrap(),
        MutationOutcome::Applied
    );
    assert!(!study.document().has_decks());
    assert_eq!(study.document().active_deck_id(), None);
    assert!(study.document().cards_by_deck_id().is_empty());
    assert_eq!(
        study.create_card("f", "b").await.unwrap(),
        MutationOutcome::Ignored(IgnoredReason::NoActiveDeck)
    );
}
