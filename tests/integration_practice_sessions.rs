use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use tempfile::TempDir;

use vokab::catalog::Catalog;
use vokab::controller::{
    Completion, Phase, Severity, ALERT_LOAD_FAILED, MSG_EXHAUSTED, MSG_NO_WORDS,
};
use vokab::error::{DrillError, LoadError};
use vokab::seen_cache::{SeenCache, CACHE_KEY};
use vokab::session::SessionConfig;
use vokab::storage::{FileKeyValueStore, KeyValueStore};
use vokab::word_store::DirWordStore;
use vokab::SessionController;

const CATALOG: &str = r#"{
  "languages": {
    "French": {
      "sourceProperty": "french",
      "targetProperty": "english",
      "levels": [
        { "id": "A1", "name": "A1 (Basic)", "dataFile": "fr/a1.json" },
        { "id": "empty", "name": "Empty", "dataFile": "fr/empty.json" },
        { "id": "broken", "name": "Broken", "dataFile": "fr/broken.json" }
      ]
    }
  }
}"#;

const A1_WORDS: &str = r#"{
  "words": [
    { "french": "chat", "english": ["cat"] },
    { "french": "chien", "english": ["dog"] },
    { "french": "maison", "english": ["house", "home"] }
  ]
}"#;

struct Fixture {
    _root: TempDir,
    catalog_path: std::path::PathBuf,
    data_dir: std::path::PathBuf,
    state_dir: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("data");
        fs::create_dir_all(data_dir.join("fr")).unwrap();
        fs::write(data_dir.join("fr/a1.json"), A1_WORDS).unwrap();
        fs::write(data_dir.join("fr/empty.json"), "{}").unwrap();
        fs::write(data_dir.join("fr/broken.json"), "{ \"words\": [").unwrap();

        let catalog_path = root.path().join("catalog.json");
        fs::write(&catalog_path, CATALOG).unwrap();

        let state_dir = root.path().join("state");
        Self {
            catalog_path,
            data_dir,
            state_dir,
            _root: root,
        }
    }

    // A fresh controller over the same on-disk state, as after an app restart
    fn controller(&self, cache_limit: usize) -> SessionController {
        let catalog = Catalog::from_path(&self.catalog_path).unwrap();
        let cache = SeenCache::load(
            Box::new(FileKeyValueStore::with_dir(&self.state_dir)),
            cache_limit,
        );
        SessionController::new(
            catalog,
            Arc::new(DirWordStore::new(&self.data_dir)),
            cache,
            SessionConfig {
                advance_delay: Duration::from_millis(0),
                ..SessionConfig::default()
            },
        )
        .with_seed(7)
    }

    fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}

fn correct_answer(controller: &SessionController) -> String {
    controller
        .current_word()
        .unwrap()
        .accepted_answers("english")
        .remove(0)
}

fn answer_all_correctly(controller: &mut SessionController) -> usize {
    let mut answered = 0;
    while controller.phase() == Phase::Active {
        let answer = correct_answer(controller).to_uppercase();
        let outcome = controller.check_answer(&format!(" {answer} ")).unwrap();
        assert!(outcome.correct);
        answered += 1;
        controller.advance().unwrap();
    }
    answered
}

#[test]
fn learned_words_are_not_offered_after_restart() {
    let fixture = Fixture::new();

    let mut controller = fixture.controller(100);
    controller.start_session("French", "A1").unwrap();
    assert_eq!(answer_all_correctly(&mut controller), 3);
    assert_eq!(controller.phase(), Phase::Complete(Completion::Finished));
    assert_eq!(controller.cache().len(), 3);
    assert!(fixture.state_dir().join(CACHE_KEY).exists());

    let mut restarted = fixture.controller(100);
    assert_eq!(restarted.cache().len(), 3);
    restarted.start_session("French", "A1").unwrap();

    assert_eq!(restarted.phase(), Phase::Complete(Completion::Exhausted));
    assert_eq!(restarted.prompt_text(), MSG_EXHAUSTED);
    assert!(!restarted.submit_enabled());
}

#[test]
fn incorrect_answers_list_every_accepted_answer_and_are_not_remembered() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(100);
    controller.start_session("French", "A1").unwrap();

    let expected = controller
        .current_word()
        .unwrap()
        .accepted_answers("english");
    let outcome = controller.check_answer("definitely wrong").unwrap();

    assert!(!outcome.correct);
    assert_eq!(outcome.accepted_answers, expected);
    let result = controller.result().unwrap();
    assert_eq!(result.severity, Severity::Error);
    assert_eq!(
        result.text,
        format!("Incorrect! Correct answers: {}", expected.join(", "))
    );
    assert!(controller.cache().is_empty());
    assert!(!controller.submit_enabled());

    let mut restarted = fixture.controller(100);
    restarted.start_session("French", "A1").unwrap();
    assert_eq!(restarted.phase(), Phase::Active);
}

#[test]
fn empty_answer_keeps_the_turn_open() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(100);
    controller.start_session("French", "A1").unwrap();
    let prompt = controller.prompt_text().to_string();

    assert_matches!(controller.check_answer("   "), Err(DrillError::EmptyAnswer));
    assert!(controller.submit_enabled());
    assert_eq!(controller.prompt_text(), prompt);
    assert_eq!(controller.progress(), Some((1, 3)));
}

#[test]
fn eviction_lets_old_words_come_back() {
    let fixture = Fixture::new();

    let mut controller = fixture.controller(1);
    controller.start_session("French", "A1").unwrap();
    answer_all_correctly(&mut controller);
    assert_eq!(controller.cache().len(), 1);

    let mut restarted = fixture.controller(1);
    restarted.start_session("French", "A1").unwrap();
    assert_eq!(restarted.phase(), Phase::Active);
    let offered = restarted.current_word().unwrap().clone();
    assert!(!restarted.cache().contains(&offered));
}

#[test]
fn level_without_words_completes_immediately() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(100);

    controller.start_session("French", "empty").unwrap();

    assert_eq!(controller.phase(), Phase::Complete(Completion::NoWords));
    assert_eq!(controller.take_alert(), None);
    assert_eq!(controller.prompt_text(), MSG_NO_WORDS);
    assert!(!controller.submit_enabled());
}

#[test]
fn unreadable_level_reports_and_allows_retry() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(100);

    assert_matches!(
        controller.start_session("French", "broken"),
        Err(DrillError::Load(LoadError::Parse { .. }))
    );
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.take_alert().as_deref(), Some(ALERT_LOAD_FAILED));

    controller.start_session("French", "A1").unwrap();
    assert_eq!(controller.phase(), Phase::Active);
}

#[test]
fn cleared_cache_is_persisted_empty() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(100);
    controller.start_session("French", "A1").unwrap();
    answer_all_correctly(&mut controller);

    controller.cache_mut().clear().unwrap();

    let store = FileKeyValueStore::with_dir(fixture.state_dir());
    assert!(store.load(CACHE_KEY).is_some());
    let mut restarted = fixture.controller(100);
    assert!(restarted.cache().is_empty());
    restarted.start_session("French", "A1").unwrap();
    assert_eq!(restarted.phase(), Phase::Active);
}
