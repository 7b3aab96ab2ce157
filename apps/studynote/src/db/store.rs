//! Namespaced key/value storage.
//!
//! Every namespace holds one serialised collection that is always read and
//! written as a whole. Writes replace the previous value; there are no
//! transactions across namespaces.

use crate::db::error::DbError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Namespace keys, named as in existing browser storage dumps.
pub mod namespace {
    pub const NOTES: &str = "notes";
    pub const GROUPS: &str = "groups";
    pub const FLASH_CARD_SETS: &str = "flashCardSets";
    pub const TEST_SETS: &str = "testSets";
    pub const FLASH_CARD_STATS: &str = "flashCardStats";
    pub const SETTINGS: &str = "appSettings";
}

pub trait KeyValueStore {
    fn get(&self, namespace: &str) -> Result<Option<String>>;
    fn set(&self, namespace: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, namespace: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, namespace: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (namespace, value, updated_at) VALUES (?1, ?2, ?3)",
            params![namespace, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// In-process store that forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(namespace).cloned())
    }

    fn set(&self, namespace: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(namespace.to_string(), value.to_string());
        Ok(())
    }
}
