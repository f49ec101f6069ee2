#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{LoadError, SessionError};
pub use sessions::{AnswerOutcome, QuizLoopService, QuizSession, SessionProgress};
