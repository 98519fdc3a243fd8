//! Viewer configuration from the environment.

use crate::feed::FeedSource;
use std::path::PathBuf;

pub const DEFAULT_FEED: &str = "http://127.0.0.1:3000";
const APP_DIR: &str = "vocab-flashcards";
const DB_FILE: &str = "flashcards.db";
const LOG_FILE: &str = "viewer.log";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub feed: FeedSource,
    pub data_dir: PathBuf,
    /// Ratings JSON (`{"word": n}`) merged into the local store at startup.
    pub import_ratings: Option<PathBuf>,
    /// Where to write all rating overrides when the viewer exits.
    pub export_ratings: Option<PathBuf>,
}

impl ViewerConfig {
    /// Read `VOCAB_FEED`, `VOCAB_DATA_DIR`, `VOCAB_IMPORT_RATINGS` and
    /// `VOCAB_EXPORT_RATINGS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed = FeedSource::parse(&non_empty("VOCAB_FEED").unwrap_or_else(|| DEFAULT_FEED.into()));
        let data_dir = non_empty("VOCAB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let import_ratings = non_empty("VOCAB_IMPORT_RATINGS").map(PathBuf::from);
        let export_ratings = non_empty("VOCAB_EXPORT_RATINGS").map(PathBuf::from);

        Self {
            feed,
            data_dir,
            import_ratings,
            export_ratings,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
