//! Persistence: the storage port, its adapters and the exam repository.

pub mod file_store;
pub mod helpers;
mod migrations;
pub mod models;
pub mod repositories;
pub mod sample;
pub mod sqlite;
pub mod store;

pub use file_store::JsonFileStore;
pub use repositories::{ExamRepository, STORAGE_KEY};
pub use sqlite::SqliteStore;
pub use store::{DocumentStore, MemoryStore};
