use std::time::Duration;

use crate::catalog::{LanguageDescriptor, LevelDescriptor, DEFAULT_TARGET_FIELD};
use crate::word::WordRecord;

pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause between answer feedback and the next word
    pub advance_delay: Duration,
    pub fallback_target_field: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(DEFAULT_ADVANCE_DELAY_MS),
            fallback_target_field: DEFAULT_TARGET_FIELD.to_string(),
        }
    }
}

/// Live practice state for one language level
#[derive(Debug, Clone)]
pub struct SessionState {
    pub words: Vec<WordRecord>,
    pub current_index: usize,
    pub language: String,
    pub descriptor: LanguageDescriptor,
    pub level: LevelDescriptor,
}

impl SessionState {
    pub fn new(
        words: Vec<WordRecord>,
        language: String,
        descriptor: LanguageDescriptor,
        level: LevelDescriptor,
    ) -> Self {
        Self {
            words,
            current_index: 0,
            language,
            descriptor,
            level,
        }
    }

    pub fn current_word(&self) -> Option<&WordRecord> {
        self.words.get(self.current_index)
    }

    pub fn has_remaining_turns(&self) -> bool {
        self.current_index < self.words.len()
    }

    pub fn source_field(&self) -> Option<&str> {
        self.descriptor.source_property.as_deref()
    }
}
