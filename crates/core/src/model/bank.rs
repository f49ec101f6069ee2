use serde::{Deserialize, Serialize};

use crate::model::question::Question;

//
// ─── WIRE MODEL ────────────────────────────────────────────────────────────────
//

/// One selectable option as it appears in the bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// A question as it appears in the bank file, before category stamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankQuestion {
    pub question: String,
    pub options: Vec<AnswerOption>,
}

/// A named category grouping questions in the bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category: String,
    pub questions: Vec<BankQuestion>,
}

/// The full question bank: an ordered sequence of categories.
///
/// Serializes as a bare JSON array, matching the bank file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of questions across all categories.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    /// Flatten into a single ordered question list, stamping each question
    /// with its category name.
    #[must_use]
    pub fn flatten(self) -> Vec<Question> {
        let mut questions = Vec::with_capacity(self.question_count());
        for category in self.categories {
            for entry in category.questions {
                questions.push(Question::new(
                    category.category.clone(),
                    entry.question,
                    entry.options,
                ));
            }
        }
        questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
