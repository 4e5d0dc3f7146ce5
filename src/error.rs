use std::path::PathBuf;

/// Failures while reading the language/level catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(String),

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while fetching one level's word list
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Word list not found: {0}")]
    NotFound(String),

    #[error("Failed to read word list {data_file}: {source}")]
    Io {
        data_file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid word list {data_file}: {source}")]
    Parse {
        data_file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while persisting to durable key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by the session controller to the presentation layer
#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown level {level} for language {language}")]
    UnknownLevel { language: String, level: String },

    #[error("Language {0} has no source property configured")]
    MissingSourceField(String),

    #[error("Please select a valid level to load.")]
    IncompleteSelection,

    #[error("A level is already loading")]
    LoadInProgress,

    #[error("Please enter an answer.")]
    EmptyAnswer,

    #[error("Submission is not available right now")]
    SubmissionUnavailable,

    #[error("No current word")]
    NoCurrentWord,

    #[error("No active session")]
    NoActiveSession,

    #[error(transparent)]
    Load(#[from] LoadError),
}
