use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use quiz_core::QuestionBank;
use thiserror::Error;

use crate::fs::{FileStore, JsonFileSource};

/// Key under which quiz progress is persisted.
pub const PROGRESS_KEY: &str = "quizProgress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store unavailable: {0}")]
    Connection(String),
}

/// String-keyed key-value contract for persisted progress.
///
/// Reads and writes are synchronous local operations; a single session owns
/// each key at a time, so adapters need no concurrent-writer handling.
pub trait ProgressStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read. A missing key is
    /// `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Provider of the question bank, consumed once at startup.
pub trait QuestionSource: Send + Sync {
    /// Load the full bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unreachable` if the source cannot be read and
    /// `StorageError::Serialization` if its content is malformed.
    fn load(&self) -> Result<QuestionBank, StorageError>;
}

/// In-memory key-value store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Question source backed by an already-built bank.
#[derive(Clone)]
pub struct StaticSource {
    bank: QuestionBank,
}

impl StaticSource {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }
}

impl QuestionSource for StaticSource {
    fn load(&self) -> Result<QuestionBank, StorageError> {
        Ok(self.bank.clone())
    }
}

/// Aggregates the progress store and question source behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(bank: QuestionBank) -> Self {
        Self {
            progress: Arc::new(InMemoryStore::new()),
            questions: Arc::new(StaticSource::new(bank)),
        }
    }

    /// File-backed stores: progress under `progress_dir`, the bank read
    /// from `bank_path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the progress directory cannot be prepared.
    pub fn file(
        bank_path: impl Into<PathBuf>,
        progress_dir: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            progress: Arc::new(FileStore::open(progress_dir)?),
            questions: Arc::new(JsonFileSource::new(bank_path)),
        })
    }
}
