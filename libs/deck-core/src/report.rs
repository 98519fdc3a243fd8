//! Rating distribution summary over a word list.

use crate::rating::{effective_rating, RatingStore};
use crate::types::{Rating, WordRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingReport {
    pub total_words: usize,
    /// Words still at the lowest rating (never rated up).
    pub words_without_rating: usize,
    /// Count per rating, keyed "1" through "5".
    pub rating_distribution: BTreeMap<String, usize>,
}

impl RatingReport {
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let mut rating_distribution: BTreeMap<String, usize> =
            (1..=5).map(|r| (r.to_string(), 0)).collect();
        let mut total_words = 0;

        for rating in ratings {
            total_words += 1;
            *rating_distribution.entry(rating.to_string()).or_default() += 1;
        }

        Self {
            total_words,
            words_without_rating: rating_distribution["1"],
            rating_distribution,
        }
    }

    /// Report over the ratings shipped with the feed.
    pub fn baseline(words: &[WordRecord]) -> Self {
        Self::from_ratings(words.iter().map(|w| w.rating))
    }

    /// Report over ratings as the user currently sees them.
    pub fn effective<S: RatingStore + ?Sized>(words: &[WordRecord], store: &S) -> Self {
        Self::from_ratings(words.iter().map(|w| effective_rating(w, store)))
    }

    pub fn count(&self, rating: Rating) -> usize {
        self.rating_distribution
            .get(&rating.to_string())
            .copied()
            .unwrap_or(0)
    }
}
