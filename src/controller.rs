use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::{Catalog, LevelDescriptor};
use crate::error::{DrillError, LoadError};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::seen_cache::SeenCache;
use crate::session::{SessionConfig, SessionState};
use crate::util::normalize_answer;
use crate::word::WordRecord;
use crate::word_store::WordStore;

pub const MSG_CORRECT: &str = "Correct!";
pub const MSG_EMPTY_ANSWER: &str = "Please enter an answer.";
pub const MSG_NO_WORDS: &str = "No words available.";
pub const MSG_EXHAUSTED: &str = "All words have been seen or answered correctly.";
pub const MSG_COMPLETE: &str = "Practice complete!";
pub const MSG_INVALID_CONFIG: &str = "Invalid config";
pub const ALERT_LOAD_FAILED: &str = "Error loading level. Please try again.";
pub const ALERT_SELECT_LEVEL: &str = "Please select a valid level to load.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Completion {
    #[strum(to_string = "no words in this level")]
    NoWords,
    #[strum(to_string = "all words seen")]
    Exhausted,
    #[strum(to_string = "practice complete")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Active,
    Complete(Completion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// Inline result message shown under the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub severity: Severity,
}

impl Feedback {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Word(WordRecord),
    Exhausted,
    NoWords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub accepted_answers: Vec<String>,
}

/// Issued when a level load begins; hand it back to [`SessionController::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    language: String,
    level: LevelDescriptor,
}

impl LoadTicket {
    pub fn data_file(&self) -> &str {
        &self.level.data_file
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }
}

#[derive(Debug, Clone, Copy)]
enum ScheduledAction {
    Advance { generation: u64 },
}

/// Drives one practice session at a time: level loading, word selection,
/// answer checking and progression, plus the read model the UI renders.
pub struct SessionController {
    catalog: Catalog,
    store: Arc<dyn WordStore>,
    cache: SeenCache,
    config: SessionConfig,
    scheduler: Scheduler<ScheduledAction>,
    pending_advance: Option<TaskHandle>,
    rng: StdRng,
    // bumped on every session start; stale loads and timers compare against it
    generation: u64,
    phase: Phase,
    session: Option<SessionState>,
    selected_language: Option<String>,
    selected_level: Option<String>,
    prompt: String,
    result: Option<Feedback>,
    last_outcome: Option<AnswerOutcome>,
    submit_enabled: bool,
    alert: Option<String>,
}

impl SessionController {
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn WordStore>,
        cache: SeenCache,
        config: SessionConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            cache,
            config,
            scheduler: Scheduler::new(),
            pending_advance: None,
            rng: StdRng::from_entropy(),
            generation: 0,
            phase: Phase::Idle,
            session: None,
            selected_language: None,
            selected_level: None,
            prompt: String::new(),
            result: None,
            last_outcome: None,
            submit_enabled: false,
            alert: None,
        }
    }

    /// Deterministic word selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ---- session lifecycle ----

    /// Load a level synchronously through the configured word store.
    pub fn start_session(&mut self, language_id: &str, level_id: &str) -> Result<(), DrillError> {
        let ticket = self.begin_session(language_id, level_id)?;
        let result = self.store.load(ticket.data_file());
        self.complete_load(ticket, result)
    }

    /// Validate the selection, drop the previous session and enter `Loading`.
    pub fn begin_session(
        &mut self,
        language_id: &str,
        level_id: &str,
    ) -> Result<LoadTicket, DrillError> {
        if self.phase == Phase::Loading {
            return Err(DrillError::LoadInProgress);
        }

        let descriptor = self
            .catalog
            .language(language_id)
            .ok_or_else(|| DrillError::UnknownLanguage(language_id.to_string()))?;
        let level = descriptor
            .level(level_id)
            .ok_or_else(|| DrillError::UnknownLevel {
                language: language_id.to_string(),
                level: level_id.to_string(),
            })?
            .clone();
        if descriptor.source_property.is_none() {
            return Err(DrillError::MissingSourceField(language_id.to_string()));
        }

        self.cancel_pending_advance();
        self.generation += 1;
        self.session = None;
        self.phase = Phase::Loading;
        self.prompt.clear();
        self.result = None;
        self.last_outcome = None;
        self.submit_enabled = false;

        tracing::info!(
            language = language_id,
            level = %level.id,
            data_file = %level.data_file,
            "loading level"
        );

        Ok(LoadTicket {
            generation: self.generation,
            language: language_id.to_string(),
            level,
        })
    }

    /// Finish a load started by [`begin_session`](Self::begin_session).
    /// Tickets from superseded sessions are ignored.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<WordRecord>, LoadError>,
    ) -> Result<(), DrillError> {
        if ticket.generation != self.generation || self.phase != Phase::Loading {
            tracing::debug!(data_file = ticket.data_file(), "ignoring stale level load");
            return Ok(());
        }

        let words = match result {
            Ok(words) => words,
            Err(e) => {
                tracing::error!("Error loading level: {e}");
                self.phase = Phase::Idle;
                self.alert = Some(ALERT_LOAD_FAILED.to_string());
                return Err(e.into());
            }
        };

        let descriptor = match self.catalog.language(&ticket.language) {
            Some(descriptor) => descriptor.clone(),
            None => {
                self.phase = Phase::Idle;
                return Err(DrillError::UnknownLanguage(ticket.language));
            }
        };

        tracing::info!(words = words.len(), "level loaded");
        let empty = words.is_empty();
        self.session = Some(SessionState::new(
            words,
            ticket.language,
            descriptor,
            ticket.level,
        ));

        if empty {
            self.prompt = MSG_NO_WORDS.to_string();
            self.phase = Phase::Complete(Completion::NoWords);
            self.submit_enabled = false;
            return Ok(());
        }

        self.phase = Phase::Active;
        self.select_next()?;
        Ok(())
    }

    /// Pick a random word not yet in the seen cache and make it current.
    pub fn select_next(&mut self) -> Result<Selection, DrillError> {
        let session = self.session.as_mut().ok_or(DrillError::NoActiveSession)?;

        if session.words.is_empty() {
            self.prompt = MSG_NO_WORDS.to_string();
            self.submit_enabled = false;
            return Ok(Selection::NoWords);
        }

        let remaining: Vec<usize> = session
            .words
            .iter()
            .enumerate()
            .filter(|(_, word)| !self.cache.contains(word))
            .map(|(idx, _)| idx)
            .collect();

        if remaining.is_empty() {
            tracing::info!(language = %session.language, "all words seen");
            self.prompt = MSG_EXHAUSTED.to_string();
            self.submit_enabled = false;
            self.phase = Phase::Complete(Completion::Exhausted);
            return Ok(Selection::Exhausted);
        }

        let chosen = remaining[self.rng.gen_range(0..remaining.len())];
        let position = if session.current_index < session.words.len() {
            session.words.swap(session.current_index, chosen);
            session.current_index
        } else {
            chosen
        };
        let word = session.words[position].clone();

        self.prompt = session
            .source_field()
            .and_then(|field| word.prompt(field))
            .unwrap_or(MSG_INVALID_CONFIG)
            .to_string();
        self.phase = Phase::Active;
        self.submit_enabled = true;

        Ok(Selection::Word(word))
    }

    /// Grade `input` against the current word and schedule the next turn.
    pub fn check_answer(&mut self, input: &str) -> Result<AnswerOutcome, DrillError> {
        if !self.submit_enabled {
            return Err(DrillError::SubmissionUnavailable);
        }

        let answer = normalize_answer(input);
        if answer.is_empty() {
            self.result = Some(Feedback::new(MSG_EMPTY_ANSWER, Severity::Error));
            return Err(DrillError::EmptyAnswer);
        }

        let session = self.session.as_ref().ok_or(DrillError::NoActiveSession)?;
        let word = session
            .current_word()
            .cloned()
            .ok_or(DrillError::NoCurrentWord)?;
        let accepted_answers = word.accepted_answers(
            session
                .descriptor
                .target_field(&self.config.fallback_target_field),
        );
        let correct = accepted_answers.contains(&answer);

        if correct {
            self.result = Some(Feedback::new(MSG_CORRECT, Severity::Success));
            if let Err(e) = self.cache.record(word) {
                tracing::warn!("failed to persist seen-word cache: {e}");
            }
        } else {
            self.result = Some(Feedback::new(
                format!(
                    "Incorrect! Correct answers: {}",
                    accepted_answers.iter().join(", ")
                ),
                Severity::Error,
            ));
        }

        self.submit_enabled = false;
        self.schedule_advance(Instant::now());

        let outcome = AnswerOutcome {
            correct,
            accepted_answers,
        };
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Move to the next turn, or finish the session when the list is used up.
    pub fn advance(&mut self) -> Result<Phase, DrillError> {
        if self.phase != Phase::Active {
            return Err(DrillError::NoActiveSession);
        }
        self.cancel_pending_advance();

        let session = self.session.as_mut().ok_or(DrillError::NoActiveSession)?;
        session.current_index += 1;

        if session.has_remaining_turns() {
            self.result = None;
            self.last_outcome = None;
            self.select_next()?;
        } else {
            tracing::info!(
                language = %session.language,
                level = %session.level.id,
                "practice complete"
            );
            self.prompt = MSG_COMPLETE.to_string();
            self.submit_enabled = false;
            self.phase = Phase::Complete(Completion::Finished);
        }

        Ok(self.phase)
    }

    /// Run scheduled work due at `now`. Returns true when anything fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut fired = false;
        for action in self.scheduler.pop_due(now) {
            match action {
                ScheduledAction::Advance { generation } if generation == self.generation => {
                    self.pending_advance = None;
                    if let Err(e) = self.advance() {
                        tracing::warn!("scheduled advance skipped: {e}");
                    }
                    fired = true;
                }
                ScheduledAction::Advance { .. } => {}
            }
        }
        fired
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }

    fn schedule_advance(&mut self, now: Instant) {
        self.cancel_pending_advance();
        let handle = self.scheduler.schedule(
            now + self.config.advance_delay,
            ScheduledAction::Advance {
                generation: self.generation,
            },
        );
        self.pending_advance = Some(handle);
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            self.scheduler.cancel(handle);
        }
    }

    // ---- presentation hooks ----

    pub fn on_language_changed(&mut self, language: Option<&str>) {
        self.selected_language = language.map(str::to_string);
        self.selected_level = None;
    }

    pub fn on_level_changed(&mut self, level: Option<&str>) {
        self.selected_level = level.map(str::to_string);
    }

    pub fn on_start(&mut self) -> Result<LoadTicket, DrillError> {
        match (self.selected_language.clone(), self.selected_level.clone()) {
            (Some(language), Some(level)) => self.begin_session(&language, &level),
            _ => {
                self.alert = Some(ALERT_SELECT_LEVEL.to_string());
                Err(DrillError::IncompleteSelection)
            }
        }
    }

    pub fn on_submit(&mut self, input: &str) -> Result<AnswerOutcome, DrillError> {
        self.check_answer(input)
    }

    pub fn on_enter_key(&mut self, input: &str) -> Result<AnswerOutcome, DrillError> {
        self.check_answer(input)
    }

    // ---- read model ----

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn word_store(&self) -> Arc<dyn WordStore> {
        Arc::clone(&self.store)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt
    }

    pub fn result(&self) -> Option<&Feedback> {
        self.result.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn level_select_enabled(&self) -> bool {
        self.selected_language
            .as_deref()
            .and_then(|name| self.catalog.language(name))
            .is_some_and(|descriptor| !descriptor.levels.is_empty())
    }

    pub fn start_enabled(&self) -> bool {
        self.selected_language.is_some()
            && self.selected_level.is_some()
            && self.phase != Phase::Loading
    }

    pub fn selected_language(&self) -> Option<&str> {
        self.selected_language.as_deref()
    }

    pub fn selected_level(&self) -> Option<&str> {
        self.selected_level.as_deref()
    }

    /// Levels of the selected language, empty when none is selected
    pub fn available_levels(&self) -> &[LevelDescriptor] {
        self.selected_language
            .as_deref()
            .and_then(|name| self.catalog.language(name))
            .map(|descriptor| descriptor.levels.as_slice())
            .unwrap_or_default()
    }

    /// One-shot user-facing alert, cleared once taken
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// (turn number, total words) of the live session
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.session.as_ref().map(|session| {
            let total = session.words.len();
            ((session.current_index + 1).min(total), total)
        })
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn current_word(&self) -> Option<&WordRecord> {
        self.session.as_ref().and_then(SessionState::current_word)
    }

    pub fn cache(&self) -> &SeenCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut SeenCache {
        &mut self.cache
    }
}
