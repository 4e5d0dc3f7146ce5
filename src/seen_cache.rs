use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::word::WordRecord;

pub const CACHE_KEY: &str = "seenWordsCache";
pub const DEFAULT_CACHE_LIMIT: usize = 100;
/// Persisted caches older than this are discarded on load
pub const RETENTION_DAYS: i64 = 365;

#[derive(Serialize, Deserialize, Debug)]
struct PersistedCache {
    #[serde(rename = "savedAt")]
    saved_at: DateTime<Utc>,
    words: Vec<WordRecord>,
}

/// Bounded FIFO of words already answered correctly.
///
/// Every `record` is followed by a full persist of the cache.
pub struct SeenCache {
    entries: VecDeque<WordRecord>,
    limit: usize,
    store: Box<dyn KeyValueStore>,
}

impl SeenCache {
    /// Restore the cache from `store`. Missing, corrupt or expired data yields an empty cache.
    pub fn load(store: Box<dyn KeyValueStore>, limit: usize) -> Self {
        Self::load_at(store, limit, Utc::now())
    }

    pub fn load_at(store: Box<dyn KeyValueStore>, limit: usize, now: DateTime<Utc>) -> Self {
        let entries = store
            .load(CACHE_KEY)
            .and_then(|raw| decode(&raw))
            .filter(|persisted| now - persisted.saved_at <= Duration::days(RETENTION_DAYS))
            .map(|persisted| {
                let skip = persisted.words.len().saturating_sub(limit);
                persisted.words.into_iter().skip(skip).collect()
            })
            .unwrap_or_default();

        Self {
            entries,
            limit,
            store,
        }
    }

    /// Append `word`, evicting the oldest entries past the limit, then persist.
    pub fn record(&mut self, word: WordRecord) -> Result<(), StorageError> {
        self.entries.push_back(word);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.persist()
    }

    pub fn contains(&self, word: &WordRecord) -> bool {
        self.entries.iter().any(|seen| seen == word)
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        let persisted = PersistedCache {
            saved_at: Utc::now(),
            words: self.entries.iter().cloned().collect(),
        };
        let json = serde_json::to_vec(&persisted)?;
        self.store.save(CACHE_KEY, &URL_SAFE_NO_PAD.encode(json))
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &WordRecord> {
        self.entries.iter()
    }
}

fn decode(raw: &str) -> Option<PersistedCache> {
    let bytes = match URL_SAFE_NO_PAD.decode(raw.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("discarding undecodable seen-word cache: {e}");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(persisted) => Some(persisted),
        Err(e) => {
            tracing::warn!("discarding unparsable seen-word cache: {e}");
            None
        }
    }
}
