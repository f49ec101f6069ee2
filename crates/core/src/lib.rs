#![forbid(unsafe_code)]

pub mod model;
pub mod time;

pub use model::{AnswerOption, Category, ProgressRecord, Question, QuestionBank, QuizResults};
pub use time::Clock;
