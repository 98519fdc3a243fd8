//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local SQLite database.
pub const SCHEMA: &str = r#"
-- User rating overrides keyed by English headword
CREATE TABLE IF NOT EXISTS ratings (
    en TEXT PRIMARY KEY,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    rated_at TEXT NOT NULL
);

-- Single-value settings such as the last seen data version
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Last good response body per feed resource (offline fallback)
CREATE TABLE IF NOT EXISTS feed_cache (
    resource TEXT PRIMARY KEY,
    body BLOB NOT NULL,
    fetched_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// Meta key holding the last seen data version token.
pub const META_DATA_VERSION: &str = "data_version";
