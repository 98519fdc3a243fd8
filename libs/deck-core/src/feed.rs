//! Word data feed parsing and version tracking.
//!
//! # Format
//! `vocab.json` is an array of word objects:
//! ```json
//! [{"en": "cat", "cz": "kočka", "pron": "kæt", "example": "A cat.", "meaning_en": "", "rating": 3}]
//! ```
//! `latest.json` carries the data version token:
//! ```json
//! {"version": "2024-05-01T10:00:00", "count": 1}
//! ```

use crate::error::{LoadError, Result};
use crate::types::{VersionInfo, WordRecord};

pub const VOCAB_RESOURCE: &str = "vocab.json";
pub const VERSION_RESOURCE: &str = "latest.json";

/// Single persisted data-version token.
pub trait VersionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn stored_version(&self) -> Option<String>;
    fn store_version(&mut self, version: &str) -> std::result::Result<(), Self::Error>;
}

/// Parse the word list, dropping records without a headword.
pub fn parse_words(bytes: &[u8]) -> Result<Vec<WordRecord>> {
    let words: Vec<WordRecord> =
        serde_json::from_slice(bytes).map_err(|e| LoadError::parse(VOCAB_RESOURCE, e))?;

    let total = words.len();
    let words: Vec<WordRecord> = words.into_iter().filter(|w| !w.en.is_empty()).collect();
    if words.len() < total {
        tracing::debug!("dropped {} records without a headword", total - words.len());
    }
    Ok(words)
}

/// Parse the data version body.
pub fn parse_version(bytes: &[u8]) -> Result<VersionInfo> {
    let info: VersionInfo =
        serde_json::from_slice(bytes).map_err(|e| LoadError::parse(VERSION_RESOURCE, e))?;
    if info.version.trim().is_empty() {
        return Err(LoadError::parse(VERSION_RESOURCE, "empty version token"));
    }
    Ok(info)
}

/// Fully loaded session data.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub words: Vec<WordRecord>,
    pub version: VersionInfo,
    /// A previous session saw a different data version.
    pub update_available: bool,
}

impl LoadOutcome {
    pub fn resolve(words: Vec<WordRecord>, version: VersionInfo, stored: Option<&str>) -> Self {
        let update_available = stored.is_some_and(|s| s != version.version);
        Self {
            words,
            version,
            update_available,
        }
    }

    /// Resolve against a version store and persist the fetched token.
    ///
    /// A failure to persist is logged; the outcome is still usable.
    pub fn resolve_with<V: VersionStore + ?Sized>(
        words: Vec<WordRecord>,
        version: VersionInfo,
        store: &mut V,
    ) -> Self {
        let stored = store.stored_version();
        let outcome = Self::resolve(words, version, stored.as_deref());
        if outcome.update_available {
            tracing::info!(
                previous = stored.as_deref().unwrap_or_default(),
                current = %outcome.version.version,
                "data update available"
            );
        }
        if let Err(e) = store.store_version(&outcome.version.version) {
            tracing::warn!("failed to persist data version: {}", e);
        }
        outcome
    }
}
