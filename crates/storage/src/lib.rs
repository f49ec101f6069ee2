#![forbid(unsafe_code)]

pub mod fs;
pub mod repository;

pub use fs::{FileStore, JsonFileSource};
pub use repository::{
    InMemoryStore, PROGRESS_KEY, ProgressStore, QuestionSource, StaticSource, Storage, StorageError,
};
