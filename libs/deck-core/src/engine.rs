//! Deck engine: the filtered working set, position, reveal state and
//! orientation for one viewing session.

use crate::rating::{effective_rating, RatingStore};
use crate::report::RatingReport;
use crate::types::{FilterCriterion, Orientation, Rating, Side, WordRecord};
use crate::view::{CardView, DeckView};
use rand::Rng;

/// Card at the current position with its effective rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentCard<'a> {
    pub word: &'a WordRecord,
    pub rating: Rating,
}

/// Session-scoped deck state over a full word list.
///
/// The deck holds indices into `words`, so every deck element is drawn from
/// the loaded set and filtering never copies records.
#[derive(Debug)]
pub struct DeckEngine<S> {
    words: Vec<WordRecord>,
    deck: Vec<usize>,
    position: usize,
    revealed: bool,
    orientation: Orientation,
    filter: FilterCriterion,
    store: S,
}

impl<S: RatingStore> DeckEngine<S> {
    /// Create an engine with no words loaded.
    pub fn new(store: S) -> Self {
        Self {
            words: Vec::new(),
            deck: Vec::new(),
            position: 0,
            revealed: false,
            orientation: Orientation::default(),
            filter: FilterCriterion::default(),
            store,
        }
    }

    /// Replace the word set wholesale and rebuild the deck with the active filter.
    pub fn load(&mut self, words: Vec<WordRecord>) {
        self.words = words;
        self.apply_filter(self.filter);
    }

    /// Drop all words, leaving an empty deck.
    pub fn clear(&mut self) {
        self.words.clear();
        self.deck.clear();
        self.position = 0;
        self.revealed = false;
    }

    /// Rebuild the deck from words whose effective rating matches `criterion`,
    /// preserving original order.
    pub fn apply_filter(&mut self, criterion: FilterCriterion) {
        self.filter = criterion;
        let store = &self.store;
        self.deck = self
            .words
            .iter()
            .enumerate()
            .filter(|(_, w)| criterion.matches(effective_rating(*w, store)))
            .map(|(i, _)| i)
            .collect();
        self.position = 0;
        self.revealed = false;
        tracing::debug!(
            filter = criterion.as_str(),
            matched = self.deck.len(),
            total = self.words.len(),
            "deck filtered"
        );
    }

    /// Unbiased in-place permutation of the deck using the thread RNG.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Fisher-Yates shuffle with a caller-provided RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.deck.len()).rev() {
            let j = rng.random_range(0..=i);
            self.deck.swap(i, j);
        }
        self.position = 0;
        self.revealed = false;
    }

    /// Card at the current position, or `None` when the deck is empty.
    pub fn current_card(&self) -> Option<CurrentCard<'_>> {
        let word = &self.words[*self.deck.get(self.position)?];
        Some(CurrentCard {
            word,
            rating: effective_rating(word, &self.store),
        })
    }

    pub fn next(&mut self) {
        if self.deck.is_empty() {
            return;
        }
        self.position = (self.position + 1) % self.deck.len();
        self.revealed = false;
    }

    pub fn previous(&mut self) {
        if self.deck.is_empty() {
            return;
        }
        let len = self.deck.len();
        self.position = (self.position + len - 1) % len;
        self.revealed = false;
    }

    /// Show the answer side of the current card.
    ///
    /// Returns the side that became visible, or `None` when the deck is
    /// empty or the card is already revealed.
    pub fn reveal(&mut self) -> Option<Side> {
        if self.deck.is_empty() || self.revealed {
            return None;
        }
        self.revealed = true;
        Some(self.orientation.answer_side())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.revealed = false;
    }

    pub fn toggle_orientation(&mut self) {
        self.set_orientation(self.orientation.toggled());
    }

    /// Store `rating` for the current card and advance one position.
    ///
    /// Returns `Ok(false)` without touching the store when the deck is empty.
    /// On a store failure the position is left unchanged.
    pub fn rate(&mut self, rating: Rating) -> Result<bool, S::Error> {
        let Some(&index) = self.deck.get(self.position) else {
            return Ok(false);
        };
        self.store.set_rating(&self.words[index].en, rating)?;
        tracing::debug!(word = %self.words[index].en, rating = rating.to_value(), "rated");
        self.next();
        Ok(true)
    }

    /// Immutable snapshot of what should be displayed.
    pub fn view(&self) -> DeckView {
        match self.current_card() {
            Some(card) => DeckView::Card(CardView::new(
                card,
                self.position,
                self.deck.len(),
                self.orientation,
                self.revealed,
                self.filter,
            )),
            None => DeckView::empty(self.filter),
        }
    }

    /// Rating distribution over the full word set as currently rated.
    pub fn report(&self) -> RatingReport {
        RatingReport::effective(&self.words, &self.store)
    }

    /// Side currently facing the user.
    pub fn visible_side(&self) -> Side {
        if self.revealed {
            self.orientation.answer_side()
        } else {
            self.orientation.prompt_side()
        }
    }

    /// Headwords of the deck in current order.
    pub fn deck_words(&self) -> impl Iterator<Item = &WordRecord> {
        self.deck.iter().map(|&i| &self.words[i])
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn filter(&self) -> FilterCriterion {
        self.filter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
