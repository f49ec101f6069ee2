use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;
use quiz_core::QuestionBank;

use crate::repository::{ProgressStore, QuestionSource, StorageError};

//
// ─── FILE STORE ────────────────────────────────────────────────────────────────
//

/// File-per-key store rooted at a directory.
///
/// Each key lives in `<root>/<key>.json`; values are written whole. Keys are
/// trusted constants, not user input.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl ProgressStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Connection(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.key_path(key), value).map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Connection(e.to_string())),
        }
    }
}

//
// ─── BANK FILE SOURCE ──────────────────────────────────────────────────────────
//

/// Question source reading the bank from a JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuestionSource for JsonFileSource {
    fn load(&self) -> Result<QuestionBank, StorageError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::Unreachable(format!("{}: {e}", self.path.display())))?;
        let bank: QuestionBank =
            serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        debug!(
            "loaded {} questions from {}",
            bank.question_count(),
            self.path.display()
        );
        Ok(bank)
    }
}
