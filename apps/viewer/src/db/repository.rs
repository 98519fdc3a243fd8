//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::db::schema::{META_DATA_VERSION, SCHEMA, SCHEMA_VERSION};
use chrono::Utc;
use deck_core::{Rating, RatingStore, VersionStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for rating overrides.
pub trait RatingRepository {
    fn get_rating_override(&self, en: &str) -> Result<Option<Rating>>;
    fn save_rating(&self, en: &str, rating: Rating) -> Result<()>;
    /// All valid overrides; unreadable rows are skipped.
    fn get_all_ratings(&self) -> Result<Vec<(String, Rating)>>;
}

/// Repository for single-value settings.
pub trait MetaRepository {
    fn get_meta(&self, key: &str) -> Result<Option<String>>;
    fn set_meta(&self, key: &str, value: &str) -> Result<()>;
}

/// Cached feed response body.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedFeed {
    pub resource: String,
    pub body: Vec<u8>,
    pub fetched_at: String,
}

/// Repository for the offline feed cache.
pub trait FeedCacheRepository {
    fn get_cached_feed(&self, resource: &str) -> Result<Option<CachedFeed>>;
    fn save_cached_feed(&self, resource: &str, body: &[u8]) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
    in_memory: bool,
}

impl std::fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("in_memory", &self.in_memory)
            .finish()
    }
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self {
            conn,
            in_memory: false,
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing and as a fallback).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn,
            in_memory: true,
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open the database at `path`, falling back to an empty in-memory
    /// database when the file is unreadable or corrupt.
    pub fn open_or_fallback<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::open(path.as_ref()) {
            Ok(repo) => Ok(repo),
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    "rating database unusable, continuing without saved ratings: {}",
                    e
                );
                Self::open_in_memory()
            }
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn rating_from_column(en: &str, value: i64) -> Result<Rating> {
        u8::try_from(value)
            .ok()
            .and_then(Rating::from_value)
            .ok_or_else(|| DbError::InvalidData(format!("rating {} for '{}'", value, en)))
    }
}

impl RatingRepository for SqliteRepository {
    fn get_rating_override(&self, en: &str) -> Result<Option<Rating>> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT rating FROM ratings WHERE en = ?1",
                params![en],
                |row| row.get(0),
            )
            .optional()?;

        value.map(|v| Self::rating_from_column(en, v)).transpose()
    }

    fn save_rating(&self, en: &str, rating: Rating) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO ratings (en, rating, rated_at) VALUES (?1, ?2, ?3)",
            params![en, rating.to_value(), now],
        )?;
        Ok(())
    }

    fn get_all_ratings(&self) -> Result<Vec<(String, Rating)>> {
        let mut stmt = self.conn.prepare("SELECT en, rating FROM ratings ORDER BY en")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let ratings = rows
            .into_iter()
            .filter_map(|(en, value)| {
                let rating = value
                    .map_err(DbError::from)
                    .and_then(|v| Self::rating_from_column(&en, v));
                match rating {
                    Ok(r) => Some((en, r)),
                    Err(e) => {
                        tracing::warn!("skipping stored rating: {}", e);
                        None
                    }
                }
            })
            .collect();

        Ok(ratings)
    }
}

impl MetaRepository for SqliteRepository {
    fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl FeedCacheRepository for SqliteRepository {
    fn get_cached_feed(&self, resource: &str) -> Result<Option<CachedFeed>> {
        self.conn
            .query_row(
                "SELECT resource, body, fetched_at FROM feed_cache WHERE resource = ?1",
                params![resource],
                |row| {
                    Ok(CachedFeed {
                        resource: row.get(0)?,
                        body: row.get(1)?,
                        fetched_at: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn save_cached_feed(&self, resource: &str, body: &[u8]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO feed_cache (resource, body, fetched_at) VALUES (?1, ?2, ?3)",
            params![resource, body, now],
        )?;
        Ok(())
    }
}

impl RatingStore for SqliteRepository {
    type Error = DbError;

    fn get_rating(&self, en: &str) -> Option<Rating> {
        match self.get_rating_override(en) {
            Ok(rating) => rating,
            Err(e) => {
                tracing::warn!(word = en, "ignoring unreadable rating: {}", e);
                None
            }
        }
    }

    fn set_rating(&mut self, en: &str, rating: Rating) -> Result<()> {
        self.save_rating(en, rating)
    }
}

impl VersionStore for SqliteRepository {
    type Error = DbError;

    fn stored_version(&self) -> Option<String> {
        match self.get_meta(META_DATA_VERSION) {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!("ignoring unreadable data version: {}", e);
                None
            }
        }
    }

    fn store_version(&mut self, version: &str) -> Result<()> {
        self.set_meta(META_DATA_VERSION, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rating(v: u8) -> Rating {
        Rating::from_value(v).unwrap()
    }

    /// Replace the ratings table with one lacking constraints, as an older
    /// or damaged database might have.
    fn loosen_ratings_table(repo: &SqliteRepository) {
        repo.conn
            .execute_batch(
                "DROP TABLE ratings;
                 CREATE TABLE ratings (en TEXT PRIMARY KEY, rating, rated_at TEXT);",
            )
            .unwrap();
    }

    #[test]
    fn rating_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_rating_override("cat").unwrap(), None);

        repo.save_rating("cat", rating(4)).unwrap();
        assert_eq!(repo.get_rating_override("cat").unwrap(), Some(rating(4)));

        repo.save_rating("cat", rating(2)).unwrap();
        assert_eq!(repo.get_rating_override("cat").unwrap(), Some(rating(2)));
    }

    #[test]
    fn rating_store_impl_writes_through() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_rating("dog", rating(5)).unwrap();
        assert_eq!(repo.get_rating("dog"), Some(rating(5)));
        assert_eq!(
            repo.get_all_ratings().unwrap(),
            vec![("dog".to_string(), rating(5))]
        );
    }

    #[test]
    fn malformed_rows_fall_back_to_baseline() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        loosen_ratings_table(&repo);
        repo.conn
            .execute_batch(
                "INSERT INTO ratings VALUES ('cat', 9, 'x');
                 INSERT INTO ratings VALUES ('dog', 'lots', 'x');
                 INSERT INTO ratings VALUES ('owl', 3, 'x');",
            )
            .unwrap();

        assert!(repo.get_rating_override("cat").is_err());
        assert_eq!(repo.get_rating("cat"), None);
        assert_eq!(repo.get_rating("dog"), None);
        assert_eq!(repo.get_rating("owl"), Some(rating(3)));
        assert_eq!(
            repo.get_all_ratings().unwrap(),
            vec![("owl".to_string(), rating(3))]
        );
    }

    #[test]
    fn version_token_persists() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.stored_version(), None);
        repo.store_version("2024-05-01T10:00:00").unwrap();
        assert_eq!(repo.stored_version().as_deref(), Some("2024-05-01T10:00:00"));
    }

    #[test]
    fn feed_cache_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(repo.get_cached_feed("vocab.json").unwrap().is_none());

        repo.save_cached_feed("vocab.json", b"[]").unwrap();
        repo.save_cached_feed("vocab.json", b"[{\"en\":\"cat\"}]").unwrap();
        let cached = repo.get_cached_feed("vocab.json").unwrap().unwrap();
        assert_eq!(cached.body, b"[{\"en\":\"cat\"}]".to_vec());
        assert!(!cached.fetched_at.is_empty());
    }

    #[test]
    fn ratings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.db");
        {
            let repo = SqliteRepository::open(&path).unwrap();
            repo.save_rating("cat", rating(5)).unwrap();
        }
        let repo = SqliteRepository::open(&path).unwrap();
        assert!(!repo.is_in_memory());
        assert_eq!(repo.get_rating("cat"), Some(rating(5)));
    }

    #[test]
    fn corrupt_database_file_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.db");
        std::fs::write(&path, b"this is definitely not a sqlite database file, just text").unwrap();

        let repo = SqliteRepository::open_or_fallback(&path).unwrap();
        assert!(repo.is_in_memory());
        assert_eq!(repo.get_rating("cat"), None);
    }
}
