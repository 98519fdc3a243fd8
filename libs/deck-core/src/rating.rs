//! Rating overrides and effective rating resolution.

use crate::types::{Rating, WordRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;

/// Key-value persistence of user ratings keyed by English headword.
///
/// Lookups never fail: unreadable or out-of-range entries are reported as
/// absent so the baseline rating applies.
pub trait RatingStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get_rating(&self, en: &str) -> Option<Rating>;
    fn set_rating(&mut self, en: &str, rating: Rating) -> Result<(), Self::Error>;
}

/// Rating used for filtering and display: the stored override if present,
/// else the baseline from the feed. Never cached.
pub fn effective_rating<S: RatingStore + ?Sized>(word: &WordRecord, store: &S) -> Rating {
    store.get_rating(&word.en).unwrap_or(word.rating)
}

/// In-memory rating store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRatingStore {
    ratings: HashMap<String, Rating>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a JSON object of `{ "headword": rating }`.
    ///
    /// Corrupt input yields an empty store; entries outside 1-5 are skipped.
    pub fn from_json(json: &str) -> Self {
        let parsed: HashMap<String, Value> = match serde_json::from_str(json) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("discarding malformed rating data: {}", e);
                return Self::default();
            }
        };

        let ratings = parsed
            .into_iter()
            .filter_map(|(en, value)| {
                let rating = value
                    .as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .and_then(Rating::from_value);
                if rating.is_none() {
                    tracing::warn!(word = %en, "skipping invalid stored rating {}", value);
                }
                rating.map(|r| (en, r))
            })
            .collect();

        Self { ratings }
    }

    /// Serialize as a JSON object of `{ "headword": rating }`.
    pub fn to_json(&self) -> String {
        let map: HashMap<&str, u8> = self
            .ratings
            .iter()
            .map(|(en, r)| (en.as_str(), r.to_value()))
            .collect();
        serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rating)> {
        self.ratings.iter().map(|(en, r)| (en.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl FromIterator<(String, Rating)> for MemoryRatingStore {
    fn from_iter<I: IntoIterator<Item = (String, Rating)>>(iter: I) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

impl RatingStore for MemoryRatingStore {
    type Error = Infallible;

    fn get_rating(&self, en: &str) -> Option<Rating> {
        self.ratings.get(en).copied()
    }

    fn set_rating(&mut self, en: &str, rating: Rating) -> Result<(), Self::Error> {
        self.ratings.insert(en.to_string(), rating);
        Ok(())
    }
}

/// Store whose writes always fail, for exercising error paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ReadOnlyRatingStore;

#[cfg(test)]
impl RatingStore for ReadOnlyRatingStore {
    type Error = std::io::Error;

    fn get_rating(&self, _en: &str) -> Option<Rating> {
        None
    }

    fn set_rating(&mut self, _en: &str, _rating: Rating) -> Result<(), Self::Error> {
        Err(std::io::Error::other("storage is read-only"))
    }
}
