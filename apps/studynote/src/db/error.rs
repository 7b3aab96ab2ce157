//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data in {namespace}: {source}")]
    InvalidData {
        namespace: String,
        source: serde_json::Error,
    },
}
