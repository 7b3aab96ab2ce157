//! Local persistence: JSON collections stored under namespaces in SQLite.

pub mod error;
pub mod repository;
pub mod schema;
pub mod store;

pub use error::DbError;
pub use repository::{
    AppSettings, FlashCardRepository, GroupRepository, NoteRepository, SettingsRepository,
    StatsRepository, TestRepository,
};
pub use store::{namespace, KeyValueStore, MemoryStore, SqliteStore};
