//! SQLite schema definitions.

/// One row per namespace; `value` holds the whole JSON collection.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    namespace TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
