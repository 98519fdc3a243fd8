//! Immutable display snapshots pushed to a render surface.

use crate::engine::CurrentCard;
use crate::gesture::CardTransform;
use crate::report::RatingReport;
use crate::types::{FilterCriterion, Orientation, Rating, Side};

pub const EMPTY_DECK_MESSAGE: &str = "No cards match the filter.";

/// One language side of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFace {
    pub word: String,
    /// Pronunciation on the English side, English meaning on the Czech side.
    pub detail: Option<String>,
    pub example: Option<String>,
    pub show_example: bool,
}

/// Display state of the card at the current position.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub en: CardFace,
    pub cz: CardFace,
    pub visible: Side,
    pub revealed: bool,
    pub orientation: Orientation,
    pub filter: FilterCriterion,
    pub rating: Rating,
    pub position: usize,
    pub len: usize,
    pub transform: CardTransform,
}

impl CardView {
    pub fn new(
        card: CurrentCard<'_>,
        position: usize,
        len: usize,
        orientation: Orientation,
        revealed: bool,
        filter: FilterCriterion,
    ) -> Self {
        let word = card.word;
        // The example is a hint, so it only appears on the side that is
        // not the prompt.
        let en = CardFace {
            word: word.en.clone(),
            detail: word.pron.clone(),
            example: word.example.clone(),
            show_example: orientation == Orientation::PromptCz,
        };
        let cz = CardFace {
            word: word.cz.clone().unwrap_or_default(),
            detail: word.meaning_en.clone(),
            example: word.example.clone(),
            show_example: orientation == Orientation::PromptEn,
        };
        let visible = if revealed {
            orientation.answer_side()
        } else {
            orientation.prompt_side()
        };

        Self {
            en,
            cz,
            visible,
            revealed,
            orientation,
            filter,
            rating: card.rating,
            position,
            len,
            transform: CardTransform::NEUTRAL,
        }
    }

    pub fn visible_face(&self) -> &CardFace {
        match self.visible {
            Side::En => &self.en,
            Side::Cz => &self.cz,
        }
    }

    /// Counter text, e.g. `3 / 10  (★4)`.
    pub fn counter(&self) -> String {
        format!("{} / {}  (★{})", self.position + 1, self.len, self.rating)
    }
}

/// What the deck area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckView {
    /// Loaded, but the filter matches nothing.
    Empty {
        filter: FilterCriterion,
        message: &'static str,
    },
    /// Data could not be loaded; terminal until the user reloads.
    LoadFailed { message: String },
    Card(CardView),
}

impl DeckView {
    pub fn empty(filter: FilterCriterion) -> Self {
        Self::Empty {
            filter,
            message: EMPTY_DECK_MESSAGE,
        }
    }

    pub fn counter(&self) -> String {
        match self {
            Self::Card(card) => card.counter(),
            Self::Empty { .. } | Self::LoadFailed { .. } => "0 / 0".to_string(),
        }
    }

    /// Apply an in-flight gesture transform to the card, if any.
    pub fn with_transform(mut self, transform: CardTransform) -> Self {
        if let Self::Card(card) = &mut self {
            card.transform = transform;
        }
        self
    }
}

/// Settings overlay contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub orientation: Orientation,
    pub filter: FilterCriterion,
    pub report: RatingReport,
    pub data_version: Option<String>,
}

/// Full frame for a render surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub deck: DeckView,
    pub update_banner: bool,
    pub settings: Option<SettingsView>,
}

/// Abstract view the session pushes snapshots to.
pub trait RenderSurface {
    fn render(&mut self, screen: &Screen) -> std::io::Result<()>;
}
