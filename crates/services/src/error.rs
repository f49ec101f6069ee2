//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted while loading the question bank.
///
/// All variants are fatal to the session; there is no in-session retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question bank contains no questions")]
    Empty,
    #[error(transparent)]
    Source(#[from] StorageError),
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz already completed")]
    Completed,
    #[error("no option at display position {index}")]
    InvalidOption { index: usize },
    #[error("current question has not been answered correctly yet")]
    ProgressionLocked,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
