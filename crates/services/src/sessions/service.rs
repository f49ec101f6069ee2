use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{AnswerOption, ProgressRecord, Question, QuestionBank, QuizResults};

use super::progress::SessionProgress;
use super::shuffle::shuffled;
use crate::error::{LoadError, SessionError};

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of submitting an answer for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The selected option was the correct one. The question is now locked
    /// and progression is unlocked.
    Correct {
        /// True when this was the very first submission for the question.
        first_attempt: bool,
        explanation: String,
    },
    /// The selected option was wrong; only that option is locked, the rest
    /// stay selectable.
    Incorrect { explanation: String },
    /// The selection hit a locked option, or a question already answered
    /// correctly, and changed nothing.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session over a shuffled question list.
///
/// Steps through questions one at a time. Wrong answers lock only the chosen
/// option; moving on requires answering the current question correctly at
/// least once. Only first-submission correct answers count toward the score.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    first_attempt_correct: u32,
    answered: bool,
    answered_correct: bool,
    selected: Option<usize>,
    display_order: Vec<usize>,
    locked_options: HashSet<usize>,
    rng: StdRng,
}

impl QuizSession {
    /// Create a session over the flattened bank, shuffling the question list.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Empty` if the bank contains no questions.
    pub fn new(bank: QuestionBank) -> Result<Self, LoadError> {
        Self::with_rng(bank, StdRng::from_os_rng())
    }

    /// Like [`QuizSession::new`] with a caller-provided RNG, for
    /// deterministic shuffling in tests.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Empty` if the bank contains no questions.
    pub fn with_rng(bank: QuestionBank, mut rng: StdRng) -> Result<Self, LoadError> {
        let questions = bank.flatten();
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        let questions = shuffled(questions, &mut rng);

        let mut session = Self {
            questions,
            current: 0,
            score: 0,
            first_attempt_correct: 0,
            answered: false,
            answered_correct: false,
            selected: None,
            display_order: Vec::new(),
            locked_options: HashSet::new(),
            rng,
        };
        session.begin_question();
        Ok(session)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn first_attempt_correct(&self) -> u32 {
        self.first_attempt_correct
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// True once the cursor has moved past the last question.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// The question under the cursor, or `None` in the results state.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Bank-order index of the last selection on the current question.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// True once the current question may be advanced past.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.answered_correct
    }

    /// Presentation order of the current question's options: display
    /// position to bank-order index.
    #[must_use]
    pub fn display_order(&self) -> &[usize] {
        &self.display_order
    }

    /// The option shown at `display`, resolved through the presentation
    /// order.
    #[must_use]
    pub fn option_at(&self, display: usize) -> Option<&AnswerOption> {
        let original = *self.display_order.get(display)?;
        self.current_question()?.option(original)
    }

    /// True when the option shown at `display` no longer accepts selection.
    #[must_use]
    pub fn is_locked(&self, display: usize) -> bool {
        self.display_order.get(display).is_some_and(|original| {
            self.answered_correct || self.locked_options.contains(original)
        })
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.current,
            total: self.questions.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Final score summary: first-attempt correct answers out of the total.
    #[must_use]
    pub fn results(&self) -> QuizResults {
        QuizResults::new(self.first_attempt_correct, self.questions.len())
    }

    /// Reset per-question transient state and reshuffle the presentation
    /// order of the current question's options.
    fn begin_question(&mut self) {
        self.answered = false;
        self.answered_correct = false;
        self.selected = None;
        self.locked_options.clear();

        let count = self.current_question().map_or(0, Question::option_count);
        self.display_order = shuffled((0..count).collect(), &mut self.rng);
    }

    /// Submit the option at `display` (a position in the current
    /// presentation order).
    ///
    /// The first correct submission bumps both counters and marks the
    /// question; a wrong submission locks only the chosen option. Selections
    /// on locked options come back as [`AnswerOutcome::Ignored`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once all questions are done and
    /// `SessionError::InvalidOption` for a position outside the current
    /// option list.
    pub fn select_answer(&mut self, display: usize) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let original = *self
            .display_order
            .get(display)
            .ok_or(SessionError::InvalidOption { index: display })?;

        if self.answered_correct || self.locked_options.contains(&original) {
            return Ok(AnswerOutcome::Ignored);
        }

        let (is_correct, explanation) = {
            let question = &self.questions[self.current];
            let option = question
                .option(original)
                .ok_or(SessionError::InvalidOption { index: display })?;
            (option.is_correct, option.explanation.clone())
        };

        let first_attempt = !self.answered;
        self.answered = true;
        self.selected = Some(original);

        if is_correct {
            if first_attempt {
                self.first_attempt_correct += 1;
                self.score += 1;
                self.questions[self.current].mark_first_attempt_correct();
            }
            self.answered_correct = true;
            let count = self.questions[self.current].option_count();
            self.locked_options.extend(0..count);
            Ok(AnswerOutcome::Correct {
                first_attempt,
                explanation,
            })
        } else {
            self.locked_options.insert(original);
            Ok(AnswerOutcome::Incorrect { explanation })
        }
    }

    /// Move to the next question, or into the results state after the last
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProgressionLocked` unless the current question
    /// has been answered correctly, and `SessionError::Completed` when the
    /// session is already in the results state.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.answered_correct {
            return Err(SessionError::ProgressionLocked);
        }
        self.current += 1;
        self.begin_question();
        Ok(())
    }

    /// Reset all counters and per-question flags, reshuffle the question
    /// list, and re-enter the first question.
    pub fn restart(&mut self) {
        self.current = 0;
        self.score = 0;
        self.first_attempt_correct = 0;
        for question in &mut self.questions {
            question.reset_first_attempt();
        }
        let questions = std::mem::take(&mut self.questions);
        self.questions = shuffled(questions, &mut self.rng);
        self.begin_question();
    }

    /// Snapshot the persisted progress shape at `saved_at`.
    #[must_use]
    pub fn progress_record(&self, saved_at: DateTime<Utc>) -> ProgressRecord {
        ProgressRecord::new(self.current, self.score, self.first_attempt_correct, saved_at)
    }

    /// Apply a previously saved record, clamping the index to the question
    /// count. Freshness checks are the caller's concern.
    pub fn apply_progress(&mut self, record: &ProgressRecord) {
        self.current = record.current_question_index.min(self.questions.len());
        self.score = record.score;
        self.first_attempt_correct = record.first_attempt_correct;
        self.begin_question();
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("first_attempt_correct", &self.first_attempt_correct)
            .field("answered", &self.answered)
            .field("answered_correct", &self.answered_correct)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{BankQuestion, Category};
    use quiz_core::time::fixed_now;

    fn build_question(text: &str) -> BankQuestion {
        // One correct option among four, at a fixed bank position.
        let options = (0..4)
            .map(|i| AnswerOption {
                text: format!("{text} option {i}"),
                is_correct: i == 2,
                explanation: format!("{text} explanation {i}"),
            })
            .collect();
        BankQuestion {
            question: text.to_string(),
            options,
        }
    }

    fn build_bank(count: usize) -> QuestionBank {
        QuestionBank::new(vec![Category {
            category: "General".to_string(),
            questions: (0..count).map(|i| build_question(&format!("Q{i}"))).collect(),
        }])
    }

    fn build_session(count: usize) -> QuizSession {
        QuizSession::with_rng(build_bank(count), StdRng::seed_from_u64(11)).unwrap()
    }

    fn display_pos(session: &QuizSession, want_correct: bool) -> usize {
        (0..session.current_question().unwrap().option_count())
            .find(|&d| session.option_at(d).unwrap().is_correct == want_correct)
            .unwrap()
    }

    fn answer_correctly(session: &mut QuizSession) {
        let pos = display_pos(session, true);
        session.select_answer(pos).unwrap();
    }

    #[test]
    fn new_session_starts_at_zero_with_all_questions() {
        let session = build_session(3);
        assert_eq!(session.total(), 3);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.first_attempt_correct(), 0);
        assert!(!session.is_complete());
        assert!(session.current_question().is_some());
    }

    #[test]
    fn empty_bank_is_a_load_error() {
        let err = QuizSession::with_rng(build_bank(0), StdRng::seed_from_u64(11)).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn display_order_is_a_permutation_of_options() {
        let session = build_session(1);
        let mut order = session.display_order().to_vec();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn correct_first_try_bumps_counters_and_locks_question() {
        let mut session = build_session(2);
        let pos = display_pos(&session, true);

        let outcome = session.select_answer(pos).unwrap();
        assert!(matches!(
            outcome,
            AnswerOutcome::Correct {
                first_attempt: true,
                ..
            }
        ));
        assert_eq!(session.score(), 1);
        assert_eq!(session.first_attempt_correct(), 1);
        assert!(session.can_advance());
        assert!(session.current_question().unwrap().answered_correctly_on_first_attempt());
        assert!((0..4).all(|d| session.is_locked(d)));
    }

    #[test]
    fn wrong_answer_locks_only_that_option() {
        let mut session = build_session(1);
        let wrong = display_pos(&session, false);

        let outcome = session.select_answer(wrong).unwrap();
        assert!(matches!(outcome, AnswerOutcome::Incorrect { .. }));
        assert_eq!(session.score(), 0);
        assert_eq!(session.first_attempt_correct(), 0);
        assert!(!session.can_advance());
        assert!(session.is_locked(wrong));

        let open: Vec<usize> = (0..4).filter(|&d| !session.is_locked(d)).collect();
        assert_eq!(open.len(), 3);
    }

    #[test]
    fn wrong_then_correct_unlocks_progression_without_scoring() {
        let mut session = build_session(1);
        let wrong = display_pos(&session, false);
        session.select_answer(wrong).unwrap();

        let correct = display_pos(&session, true);
        let outcome = session.select_answer(correct).unwrap();
        assert!(matches!(
            outcome,
            AnswerOutcome::Correct {
                first_attempt: false,
                ..
            }
        ));
        assert_eq!(session.score(), 0);
        assert_eq!(session.first_attempt_correct(), 0);
        assert!(session.can_advance());
        assert!(!session.current_question().unwrap().answered_correctly_on_first_attempt());
    }

    #[test]
    fn reselecting_a_locked_option_is_ignored() {
        let mut session = build_session(1);
        let wrong = display_pos(&session, false);
        session.select_answer(wrong).unwrap();

        let outcome = session.select_answer(wrong).unwrap();
        assert_eq!(outcome, AnswerOutcome::Ignored);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn selection_after_correct_answer_is_ignored() {
        let mut session = build_session(1);
        answer_correctly(&mut session);

        for d in 0..4 {
            assert_eq!(session.select_answer(d).unwrap(), AnswerOutcome::Ignored);
        }
        assert_eq!(session.first_attempt_correct(), 1);
    }

    #[test]
    fn out_of_range_position_is_an_error() {
        let mut session = build_session(1);
        let err = session.select_answer(9).unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { index: 9 }));
    }

    #[test]
    fn advance_requires_a_correct_answer() {
        let mut session = build_session(2);
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::ProgressionLocked
        ));

        let wrong = display_pos(&session, false);
        session.select_answer(wrong).unwrap();
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::ProgressionLocked
        ));

        answer_correctly(&mut session);
        session.advance().unwrap();
        assert_eq!(session.current_index(), 1);
        assert!(!session.can_advance());
    }

    #[test]
    fn advancing_past_the_last_question_completes_the_session() {
        let mut session = build_session(1);
        answer_correctly(&mut session);
        session.advance().unwrap();

        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.select_answer(0).unwrap_err(),
            SessionError::Completed
        ));
    }

    #[test]
    fn first_attempt_counter_never_exceeds_total() {
        let mut session = build_session(3);
        while !session.is_complete() {
            answer_correctly(&mut session);
            session.advance().unwrap();
        }
        assert_eq!(session.first_attempt_correct(), 3);
        assert!(session.first_attempt_correct() as usize <= session.total());
    }

    #[test]
    fn mixed_run_scores_first_attempts_only() {
        // Q1 correct first try, Q2 wrong then correct, Q3 correct first try.
        let mut session = build_session(3);

        answer_correctly(&mut session);
        session.advance().unwrap();

        let wrong = display_pos(&session, false);
        session.select_answer(wrong).unwrap();
        answer_correctly(&mut session);
        session.advance().unwrap();

        answer_correctly(&mut session);
        session.advance().unwrap();

        assert!(session.is_complete());
        assert_eq!(session.first_attempt_correct(), 2);

        let results = session.results();
        assert_eq!(results.to_string(), "2/3");
        assert!((results.percentage() - 66.666).abs() < 0.01);
        assert!(!results.is_celebration());
    }

    #[test]
    fn perfect_run_flags_celebration() {
        let mut session = build_session(3);
        while !session.is_complete() {
            answer_correctly(&mut session);
            session.advance().unwrap();
        }
        let results = session.results();
        assert!((results.percentage() - 100.0).abs() < f64::EPSILON);
        assert!(results.is_celebration());
    }

    #[test]
    fn restart_resets_everything() {
        let mut session = build_session(2);
        answer_correctly(&mut session);
        session.advance().unwrap();

        session.restart();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.first_attempt_correct(), 0);
        assert!(!session.is_complete());
        assert!(!session.can_advance());
        assert!(session.selected().is_none());
        assert!(session
            .questions()
            .iter()
            .all(|q| !q.answered_correctly_on_first_attempt()));
    }

    #[test]
    fn restart_works_from_the_results_state() {
        let mut session = build_session(1);
        answer_correctly(&mut session);
        session.advance().unwrap();
        assert!(session.is_complete());

        session.restart();
        assert!(!session.is_complete());
        assert_eq!(session.total(), 1);
    }

    #[test]
    fn progress_view_tracks_the_cursor() {
        let mut session = build_session(2);
        assert_eq!(
            session.progress(),
            SessionProgress {
                position: 0,
                total: 2,
                is_complete: false
            }
        );
        answer_correctly(&mut session);
        session.advance().unwrap();
        assert_eq!(session.progress().position, 1);
    }

    #[test]
    fn progress_record_round_trips_through_apply() {
        let mut session = build_session(3);
        answer_correctly(&mut session);
        session.advance().unwrap();

        let record = session.progress_record(fixed_now());
        assert_eq!(record.current_question_index, 1);
        assert_eq!(record.score, 1);
        assert_eq!(record.first_attempt_correct, 1);

        let mut restored = build_session(3);
        restored.apply_progress(&record);
        assert_eq!(restored.current_index(), 1);
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.first_attempt_correct(), 1);
        assert!(!restored.can_advance());
    }

    #[test]
    fn applying_an_out_of_range_index_clamps_to_results() {
        let record = ProgressRecord::new(99, 1, 1, fixed_now());
        let mut session = build_session(2);
        session.apply_progress(&record);
        assert_eq!(session.current_index(), 2);
        assert!(session.is_complete());
    }
}
