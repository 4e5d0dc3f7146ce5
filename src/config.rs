use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::catalog::DEFAULT_TARGET_FIELD;
use crate::seen_cache::DEFAULT_CACHE_LIMIT;
use crate::session::{SessionConfig, DEFAULT_ADVANCE_DELAY_MS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub cache_limit: usize,
    pub advance_delay_ms: u64,
    pub fallback_target_field: String,
    /// Catalog JSON replacing the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Directory that `dataFile` paths are resolved against
    pub data_dir: Option<PathBuf>,
    pub last_language: Option<String>,
    pub last_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_limit: DEFAULT_CACHE_LIMIT,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            fallback_target_field: DEFAULT_TARGET_FIELD.to_string(),
            catalog_path: None,
            data_dir: None,
            last_language: None,
            last_level: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            fallback_target_field: self.fallback_target_field.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("vokab_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("ignoring invalid config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            cache_limit: 25,
            advance_delay_ms: 250,
            fallback_target_field: "german".into(),
            catalog_path: Some(PathBuf::from("/tmp/catalog.json")),
            data_dir: Some(PathBuf::from("/tmp/words")),
            last_language: Some("French".into()),
            last_level: Some("data/a1LevelFrench.json".into()),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "cache_limit": 10 }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();

        assert_eq!(loaded.cache_limit, 10);
        assert_eq!(loaded.advance_delay_ms, DEFAULT_ADVANCE_DELAY_MS);
        assert_eq!(loaded.fallback_target_field, "english");
    }

    #[test]
    fn corrupt_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn session_config_from_config() {
        let cfg = Config {
            advance_delay_ms: 300,
            ..Config::default()
        };

        assert_eq!(
            cfg.session_config().advance_delay,
            Duration::from_millis(300)
        );
    }
}
