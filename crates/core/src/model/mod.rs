mod bank;
mod progress;
mod question;
mod results;

pub use bank::{AnswerOption, BankQuestion, Category, QuestionBank};
pub use progress::ProgressRecord;
pub use question::Question;
pub use results::QuizResults;
