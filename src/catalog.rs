use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;

pub(crate) static ASSETS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

const CATALOG_FILE: &str = "catalog.json";

/// Target property used when a language descriptor does not name one
pub const DEFAULT_TARGET_FIELD: &str = "english";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "dataFile")]
    pub data_file: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LanguageDescriptor {
    #[serde(rename = "sourceProperty", default)]
    pub source_property: Option<String>,
    #[serde(rename = "targetProperty", default)]
    pub target_property: Option<String>,
    #[serde(default)]
    pub levels: Vec<LevelDescriptor>,
}

impl LanguageDescriptor {
    /// Find a level by its data file, or by its id.
    pub fn level(&self, key: &str) -> Option<&LevelDescriptor> {
        self.levels
            .iter()
            .find(|level| level.data_file == key)
            .or_else(|| self.levels.iter().find(|level| level.id == key))
    }

    pub fn target_field<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.target_property.as_deref().unwrap_or(fallback)
    }
}

/// Languages available for practice, keyed by display name
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub languages: BTreeMap<String, LanguageDescriptor>,
}

impl Catalog {
    /// The catalog bundled with the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        let file = ASSETS_DIR
            .get_file(CATALOG_FILE)
            .ok_or_else(|| CatalogError::NotFound(CATALOG_FILE.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| CatalogError::NotFound(CATALOG_FILE.to_string()))?;
        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(from_str(json)?)
    }

    pub fn language(&self, name: &str) -> Option<&LanguageDescriptor> {
        self.languages.get(name)
    }

    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_embedded_catalog() {
        let catalog = Catalog::embedded().unwrap();

        let french = catalog.language("French").expect("French is bundled");
        assert_eq!(french.source_property.as_deref(), Some("french"));
        assert_eq!(french.target_property.as_deref(), Some("english"));
        assert_eq!(french.levels[0].id, "A1");
        assert_eq!(french.levels[0].data_file, "data/a1LevelFrench.json");
    }

    #[test]
    fn test_catalog_deserialization() {
        let json_data = r#"
        {
            "languages": {
                "German": {
                    "sourceProperty": "german",
                    "levels": [
                        { "id": "A1", "name": "A1 (Basic)", "dataFile": "de/a1.json" },
                        { "id": "A2", "name": "A2 (Elementary)", "dataFile": "de/a2.json" }
                    ]
                }
            }
        }
        "#;

        let catalog = Catalog::from_json(json_data).expect("Failed to deserialize catalog");
        let german = catalog.language("German").unwrap();

        assert_eq!(german.levels.len(), 2);
        assert_eq!(german.levels[1].display_name, "A2 (Elementary)");
        assert_eq!(german.target_property, None);
        assert_eq!(german.target_field(DEFAULT_TARGET_FIELD), "english");
    }

    #[test]
    fn test_level_lookup_by_data_file_or_id() {
        let catalog = Catalog::embedded().unwrap();
        let french = catalog.language("French").unwrap();

        assert_eq!(
            french.level("data/a1LevelFrench.json").map(|l| l.id.as_str()),
            Some("A1")
        );
        assert_eq!(
            french.level("A1").map(|l| l.data_file.as_str()),
            Some("data/a1LevelFrench.json")
        );
        assert!(french.level("C2").is_none());
    }

    #[test]
    fn test_language_names_sorted() {
        let catalog = Catalog::from_json(
            r#"{ "languages": { "Spanish": { "levels": [] }, "French": { "levels": [] } } }"#,
        )
        .unwrap();

        let names: Vec<&str> = catalog.language_names().collect();
        assert_eq!(names, vec!["French", "Spanish"]);
    }

    #[test]
    fn test_invalid_catalog_json() {
        assert_matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        );
    }

    #[test]
    fn test_missing_catalog_file() {
        assert_matches!(
            Catalog::from_path("/definitely/not/here/catalog.json"),
            Err(CatalogError::Io { .. })
        );
    }
}
