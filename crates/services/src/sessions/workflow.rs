use std::sync::Arc;

use log::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::ProgressRecord;
use storage::{PROGRESS_KEY, ProgressStore, QuestionSource, StorageError};

use super::service::{AnswerOutcome, QuizSession};
use crate::error::{LoadError, SessionError};

/// Orchestrates session startup and persisted progress.
///
/// Every accepted answer overwrites the stored record under
/// [`PROGRESS_KEY`]; entering the results state or restarting deletes it.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    store: Arc<dyn ProgressStore>,
    source: Arc<dyn QuestionSource>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn ProgressStore>, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            store,
            source,
        }
    }

    /// Load the bank, build a session, and restore saved progress when a
    /// fresh record exists.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the source is unreachable, malformed, or
    /// empty. Saved progress never fails the start: unreadable or stale
    /// records are ignored.
    pub fn start(&self) -> Result<QuizSession, LoadError> {
        let bank = self.source.load()?;
        let mut session = QuizSession::new(bank)?;

        if let Some(record) = self.read_saved_progress() {
            session.apply_progress(&record);
            if session.is_complete() {
                // Restored straight into results; the record has served its
                // purpose.
                self.clear_progress();
            }
        }
        Ok(session)
    }

    /// Submit an answer and persist the updated progress.
    ///
    /// # Errors
    ///
    /// Propagates `select_answer` errors, plus `SessionError::Storage` when
    /// the record cannot be written.
    pub fn select_answer(
        &self,
        session: &mut QuizSession,
        display: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.select_answer(display)?;
        self.save_progress(session)?;
        Ok(outcome)
    }

    /// Advance to the next question; entering the results state clears the
    /// stored record, otherwise the new position is persisted.
    ///
    /// # Errors
    ///
    /// Propagates `advance` errors, plus `SessionError::Storage` when the
    /// record cannot be written.
    pub fn advance(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.advance()?;
        if session.is_complete() {
            self.clear_progress();
        } else {
            self.save_progress(session)?;
        }
        Ok(())
    }

    /// Restart the quiz and clear the stored record.
    pub fn restart(&self, session: &mut QuizSession) {
        session.restart();
        self.clear_progress();
    }

    fn read_saved_progress(&self) -> Option<ProgressRecord> {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("failed to read saved progress: {err}");
                return None;
            }
        };
        let record: ProgressRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!("ignoring unreadable saved progress: {err}");
                return None;
            }
        };
        if record.is_fresh(self.clock.now()) {
            Some(record)
        } else {
            debug!("ignoring stale saved progress");
            None
        }
    }

    fn save_progress(&self, session: &QuizSession) -> Result<(), SessionError> {
        let record = session.progress_record(self.clock.now());
        let raw = serde_json::to_string(&record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(PROGRESS_KEY, &raw)?;
        Ok(())
    }

    fn clear_progress(&self) {
        // A failed delete is not worth failing the whole flow over; the
        // record will be overwritten or expire anyway.
        if let Err(err) = self.store.remove(PROGRESS_KEY) {
            warn!("failed to clear saved progress: {err}");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
