//! Brain files on disk: round trips, format and recovery from bad files

mod common;

use std::sync::Arc;

use common::situation;
use gladiator::{
    adapters::{JsonRepository, MsgPackRepository},
    pipeline::Learner,
    ports::QTableRepository,
    q_learning::{DecisionEngine, EngineConfig, QTable, SavedQTable},
    types::SituationKey,
};
use tempfile::TempDir;

fn engine_at(repository: Arc<dyn QTableRepository>, path: &std::path::Path) -> DecisionEngine {
    DecisionEngine::load_or_create(6, EngineConfig::default().with_seed(4), repository, path)
}

#[test]
fn test_json_brain_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("brain.json");
    let repo: Arc<dyn QTableRepository> = Arc::new(JsonRepository::new());

    let s = situation(2, true, true, 5);
    let learned = {
        let mut engine = engine_at(Arc::clone(&repo), &path);
        engine.reward(&s, 40.0).unwrap();
        engine.punish(&situation(0, false, true, 1), 12.0).unwrap();
        engine.table().clone()
    };
    assert_eq!(learned.row(&s.encode()).unwrap()[0], 20.0);

    let reloaded = engine_at(repo, &path);
    assert_eq!(reloaded.table(), &learned);
}

#[test]
fn test_msgpack_brain_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("brain.msgpack");
    let repo: Arc<dyn QTableRepository> = Arc::new(MsgPackRepository::new());

    let mut engine = engine_at(Arc::clone(&repo), &path);
    for hp in 1..=5 {
        engine.reward(&situation(1, true, true, hp), f64::from(hp)).unwrap();
    }
    let learned = engine.table().clone();
    drop(engine);

    assert_eq!(engine_at(repo, &path).table(), &learned);
}

#[test]
fn test_json_layout_is_keys_and_value_arrays() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("brain.json");
    let mut engine = engine_at(Arc::new(JsonRepository::new()), &path);
    engine.reward(&situation(2, true, true, 5), 0.1).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["inputCount"], 4);
    assert_eq!(value["actionCount"], 6);
    assert_eq!(value["keys"][0], "2_1_1_5");
    let row = value["values"][0]["array"].as_array().unwrap();
    assert_eq!(row.len(), 6);
    assert_eq!(row[0].as_f64().unwrap(), 0.05);
}

#[test]
fn test_corrupt_file_is_replaced_with_fresh_brain() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("brain.json");
    std::fs::write(&path, "{ this is not a brain").unwrap();

    let repo: Arc<dyn QTableRepository> = Arc::new(JsonRepository::new());
    let engine = engine_at(Arc::clone(&repo), &path);
    assert!(engine.table().is_empty());

    // The unreadable file was overwritten with a valid empty table
    let saved = repo.load(&path).unwrap();
    assert_eq!(saved.action_count, 6);
    assert!(saved.keys.is_empty());
}

#[test]
fn test_brain_for_other_action_count_is_discarded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("brain.json");
    let repo = JsonRepository::new();

    let mut narrow = QTable::new(4);
    narrow
        .insert_row(SituationKey::from("1_1_1_5"), vec![1.0, 2.0, 3.0, 4.0])
        .unwrap();
    repo.save(&SavedQTable::from_table(&narrow, 4), &path).unwrap();

    let engine = engine_at(Arc::new(repo), &path);
    assert!(engine.table().is_empty());
    assert_eq!(engine.table().action_count(), 6);
}

#[test]
fn test_unwritable_store_does_not_interrupt_learning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing-dir").join("brain.json");

    let mut engine = engine_at(Arc::new(JsonRepository::new()), &path);
    let s = situation(1, false, true, 2);
    engine.reward(&s, 8.0).unwrap();
    assert_eq!(engine.table().row(&s.encode()).unwrap()[0], 4.0);
    assert!(engine.save().is_err());
}
