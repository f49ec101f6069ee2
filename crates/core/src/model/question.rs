use crate::model::bank::AnswerOption;

/// A runtime question: bank data stamped with its category, plus the
/// session-scoped first-attempt flag.
///
/// Options keep their bank order; presentation order is a session concern.
/// Exactly one option is expected to be correct, though this is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category: String,
    text: String,
    options: Vec<AnswerOption>,
    answered_correctly_on_first_attempt: bool,
}

impl Question {
    #[must_use]
    pub fn new(category: String, text: String, options: Vec<AnswerOption>) -> Self {
        Self {
            category,
            text,
            options,
            answered_correctly_on_first_attempt: false,
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// The option at `index` in bank order.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Bank-order index of the correct option.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }

    #[must_use]
    pub fn answered_correctly_on_first_attempt(&self) -> bool {
        self.answered_correctly_on_first_attempt
    }

    pub fn mark_first_attempt_correct(&mut self) {
        self.answered_correctly_on_first_attempt = true;
    }

    pub fn reset_first_attempt(&mut self) {
        self.answered_correctly_on_first_attempt = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question() -> Question {
        Question::new(
            "Geography".to_string(),
            "Capital of France?".to_string(),
            vec![
                AnswerOption {
                    text: "Lyon".to_string(),
                    is_correct: false,
                    explanation: "Second city.".to_string(),
                },
                AnswerOption {
                    text: "Paris".to_string(),
                    is_correct: true,
                    explanation: "Capital since 508.".to_string(),
                },
            ],
        )
    }

    #[test]
    fn finds_correct_option() {
        let question = build_question();
        assert_eq!(question.correct_index(), Some(1));
        assert_eq!(question.option(1).unwrap().text, "Paris");
        assert!(question.option(2).is_none());
    }

    #[test]
    fn first_attempt_flag_round_trips() {
        let mut question = build_question();
        assert!(!question.answered_correctly_on_first_attempt());
        question.mark_first_attempt_correct();
        assert!(question.answered_correctly_on_first_attempt());
        question.reset_first_attempt();
        assert!(!question.answered_correctly_on_first_attempt());
    }
}
