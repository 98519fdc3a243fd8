//! Core vocabulary deck library shared by the viewer and the feed backend.
//!
//! Provides:
//! - Word records with lenient feed parsing
//! - Deck engine (filtering, shuffling, navigation, reveal, rating)
//! - Gesture controller with an explicit transition state machine
//! - Keyboard mapping and the input-serializing session
//! - Immutable view snapshots for render surfaces
//! - Rating reports

pub mod engine;
pub mod error;
pub mod feed;
pub mod gesture;
pub mod input;
pub mod rating;
pub mod report;
pub mod session;
pub mod types;
pub mod view;

pub use engine::{CurrentCard, DeckEngine};
pub use error::{LoadError, Result};
pub use feed::{parse_version, parse_words, LoadOutcome, VersionStore};
pub use gesture::{
    CardTransform, GestureConfig, GestureController, GestureKind, SwipeDirection,
    TransitionEvent, TransitionPhase,
};
pub use input::{command_for, Command, Key};
pub use rating::{effective_rating, MemoryRatingStore, RatingStore};
pub use report::RatingReport;
pub use session::{KeyOutcome, Session};
pub use types::{FilterCriterion, Orientation, Rating, Side, VersionInfo, WordRecord};
pub use view::{CardFace, CardView, DeckView, RenderSurface, Screen, SettingsView};
