use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::catalog::ASSETS_DIR;
use crate::error::LoadError;
use crate::word::WordRecord;

/// Source of per-level word lists
pub trait WordStore: Send + Sync {
    /// Load the ordered word list stored under `data_file`
    fn load(&self, data_file: &str) -> Result<Vec<WordRecord>, LoadError>;
}

#[derive(Deserialize, Debug, Default)]
struct WordListFile {
    #[serde(default)]
    words: Vec<WordRecord>,
}

/// Parse a word-list document. A document without `words` is an empty level.
pub fn parse_word_list(data_file: &str, json: &str) -> Result<Vec<WordRecord>, LoadError> {
    serde_json::from_str::<WordListFile>(json)
        .map(|file| file.words)
        .map_err(|source| LoadError::Parse {
            data_file: data_file.to_string(),
            source,
        })
}

/// Word lists bundled into the binary next to the default catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedWordStore;

impl WordStore for EmbeddedWordStore {
    fn load(&self, data_file: &str) -> Result<Vec<WordRecord>, LoadError> {
        let file = ASSETS_DIR
            .get_file(data_file)
            .ok_or_else(|| LoadError::NotFound(data_file.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| LoadError::NotFound(data_file.to_string()))?;
        parse_word_list(data_file, contents)
    }
}

/// Word lists read from a directory on disk, relative to `root`
#[derive(Debug, Clone)]
pub struct DirWordStore {
    root: PathBuf,
}

impl DirWordStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl WordStore for DirWordStore {
    fn load(&self, data_file: &str) -> Result<Vec<WordRecord>, LoadError> {
        let path = self.root.join(data_file);
        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                LoadError::NotFound(data_file.to_string())
            } else {
                LoadError::Io {
                    data_file: data_file.to_string(),
                    source,
                }
            }
        })?;
        parse_word_list(data_file, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_french_level() {
        let words = EmbeddedWordStore.load("data/a1LevelFrench.json").unwrap();

        assert!(!words.is_empty());
        assert!(words.iter().all(|w| w.prompt("french").is_some()));
        assert!(words.iter().all(|w| !w.accepted_answers("english").is_empty()));
    }

    #[test]
    fn test_embedded_missing_level() {
        assert_matches!(
            EmbeddedWordStore.load("data/nonexistent.json"),
            Err(LoadError::NotFound(name)) if name == "data/nonexistent.json"
        );
    }

    #[test]
    fn test_missing_words_field_is_empty_list() {
        let words = parse_word_list("level.json", r#"{ "title": "nothing here" }"#).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_parse_preserves_order() {
        let words = parse_word_list(
            "level.json",
            r#"{ "words": [
                { "french": "chat", "english": ["cat"] },
                { "french": "chien", "english": ["dog"] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(words[0].prompt("french"), Some("chat"));
        assert_eq!(words[1].prompt("french"), Some("chien"));
    }

    #[test]
    fn test_parse_error() {
        assert_matches!(
            parse_word_list("broken.json", "{ \"words\": [ "),
            Err(LoadError::Parse { data_file, .. }) if data_file == "broken.json"
        );
    }

    #[test]
    fn test_dir_store_reads_relative_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data/level.json"),
            r#"{ "words": [ { "french": "oui", "english": ["yes"] } ] }"#,
        )
        .unwrap();

        let store = DirWordStore::new(dir.path());
        let words = store.load("data/level.json").unwrap();

        assert_eq!(words.len(), 1);
        assert_eq!(words[0].accepted_answers("english"), vec!["yes"]);
    }

    #[test]
    fn test_dir_store_missing_file() {
        let dir = tempdir().unwrap();
        let store = DirWordStore::new(dir.path());

        assert_matches!(store.load("nope.json"), Err(LoadError::NotFound(_)));
    }
}
