//! Integration tests for the file-backed game store
//!
//! Covers the full flow a player goes through:
//! - Administrator authors patterns
//! - Player submits ten results and gets a prediction
//! - Player confirms the outcome and predicts again
//! - Everything survives a reopen

use augur_core::{parse_remove_pattern, parse_set_pattern, AugurConfig, HistoryKey, Outcome};
use augur_store::{GameStore, JsonFileBackend};
use std::path::Path;
use tempfile::tempdir;

/// Helper to open a store backed by `data.json` in `dir`
async fn open_store(dir: &Path) -> GameStore<JsonFileBackend> {
    let backend = JsonFileBackend::new(dir.join("data.json"));
    GameStore::open(backend, AugurConfig::default())
        .await
        .expect("Failed to open store")
}

fn labels(items: &[&str]) -> Vec<Outcome> {
    items.iter().map(|s| Outcome::from(*s)).collect()
}

#[tokio::test]
async fn test_fresh_store_is_not_written_until_changed() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path()).await;
    assert!(!dir.path().join("data.json").exists());

    store.add_app("Stake").await.unwrap();
    assert!(dir.path().join("data.json").exists());
}

#[tokio::test]
async fn test_prediction_flow_survives_reopen() {
    let dir = tempdir().unwrap();
    let key = HistoryKey::new(6459, "1win", "WINGO");

    {
        let mut store = open_store(dir.path()).await;

        for text in [
            "/setpattern WINGO [Big, Small] → Small",
            "/setpattern WINGO Small, Big = Big",
            "/setpattern WINGO Small, Small, Small → Big",
        ] {
            let cmd = parse_set_pattern(text).unwrap();
            store
                .add_pattern(&cmd.game, cmd.pattern, cmd.outcome)
                .await
                .unwrap();
        }

        store
            .set_history(
                key.clone(),
                labels(&[
                    "Small", "Small", "Small", "Big", "Big", "Big", "Big", "Big", "Small", "Big",
                ]),
            )
            .await
            .unwrap();

        // [Small,Small,Small] x1 -> Big, [Small,Big] x2 -> Big, [Big,Small] x1 -> Small
        assert_eq!(store.predict(&key).unwrap(), Some(Outcome::from("Big")));

        // Player confirms the prediction was right
        store.record_result(&key, "Big".into()).await.unwrap();
    }

    let store = open_store(dir.path()).await;
    let history = store.history(&key).unwrap();
    assert_eq!(history.len(), 10);
    assert_eq!(history.as_slice()[0], "Small");
    assert_eq!(history.as_slice()[9], "Big");

    let table = &store.game("WINGO").unwrap().patterns;
    assert_eq!(table.len(), 3);
    let first = table.iter().next().unwrap();
    assert_eq!(first.1, "Small");
}

#[tokio::test]
async fn test_pattern_removal_persists() {
    let dir = tempdir().unwrap();

    {
        let mut store = open_store(dir.path()).await;
        let cmd = parse_set_pattern("K3 Big Odd, Big Odd → Small Even").unwrap();
        store
            .add_pattern(&cmd.game, cmd.pattern, cmd.outcome)
            .await
            .unwrap();

        let remove = parse_remove_pattern("K3 [Big Odd, Big Odd]").unwrap();
        assert!(store.remove_pattern(&remove.game, &remove.pattern).await.unwrap());
    }

    let store = open_store(dir.path()).await;
    assert!(store.game("K3").unwrap().patterns.is_empty());
}

#[tokio::test]
async fn test_catalogue_changes_persist() {
    let dir = tempdir().unwrap();

    {
        let mut store = open_store(dir.path()).await;
        store
            .add_game("DICE", Some(30), Some(labels(&["High", "Low"])))
            .await
            .unwrap();
        store.delete_game("K3").await.unwrap();
        store.delete_app("Fun88").await.unwrap();
    }

    let store = open_store(dir.path()).await;
    let names: Vec<&str> = store.games().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["WINGO", "DICE"]);
    assert_eq!(store.game("DICE").unwrap().cooldown_secs, 30);
    assert_eq!(store.apps(), &["1win", "Bet365"]);
}

#[tokio::test]
async fn test_no_match_is_not_an_error() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path()).await;
    let key = HistoryKey::new(1, "Bet365", "WINGO");

    store
        .set_history(key.clone(), labels(&["Big", "Big", "Big"]))
        .await
        .unwrap();

    assert_eq!(store.predict(&key).unwrap(), None);
}
