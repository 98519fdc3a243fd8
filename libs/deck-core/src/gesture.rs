//! Pointer gesture handling for the card surface.
//!
//! A drag moves and tilts the card. On release the gesture is classified as a
//! tap (reveal), a strong swipe (navigate) or an indeterminate move (snap
//! back). Swipes run through an explicit transition state machine:
//!
//! ```text
//! Idle -> Dragging -> AnimatingOut -> Swapping -> AnimatingIn -> Idle
//!            \-> Idle (tap / snap back)
//! ```
//!
//! While a transition is running the controller is locked: new gestures are
//! rejected so the deck is never mutated during a torn visual state.
//!
//! Direction mapping: a leftward swipe advances to the next card, a rightward
//! swipe goes back to the previous one.

use crate::engine::DeckEngine;
use crate::rating::RatingStore;

/// Tunables for gesture classification and animation.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Movement on both axes below this counts as a tap.
    pub tap_threshold: f32,
    /// Horizontal movement above this commits a swipe.
    pub swipe_threshold: f32,
    pub rotation_per_px: f32,
    /// Mostly-vertical drags narrower than this are left to scrolling.
    pub scroll_slop: f32,
    pub opacity_floor: f32,
    pub opacity_falloff: f32,
    pub fly_out_rotation: f32,
    /// How far the card travels off-screen; normally the surface width.
    pub fly_out_distance: f32,
    pub animate_out_ms: u64,
    pub animate_in_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_threshold: 15.0,
            swipe_threshold: 100.0,
            rotation_per_px: 0.1,
            scroll_slop: 30.0,
            opacity_floor: 0.5,
            opacity_falloff: 300.0,
            fly_out_rotation: 30.0,
            fly_out_distance: 800.0,
            animate_out_ms: 300,
            animate_in_ms: 300,
        }
    }
}

/// Visual transform applied to the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translate_x: f32,
    pub rotate_deg: f32,
    pub opacity: f32,
}

impl CardTransform {
    pub const NEUTRAL: CardTransform = CardTransform {
        translate_x: 0.0,
        rotate_deg: 0.0,
        opacity: 1.0,
    };

    pub const HIDDEN: CardTransform = CardTransform {
        translate_x: 0.0,
        rotate_deg: 0.0,
        opacity: 0.0,
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    fn lerp(from: CardTransform, to: CardTransform, t: f32) -> CardTransform {
        let t = t.clamp(0.0, 1.0);
        CardTransform {
            translate_x: from.translate_x + (to.translate_x - from.translate_x) * t,
            rotate_deg: from.rotate_deg + (to.rotate_deg - from.rotate_deg) * t,
            opacity: from.opacity + (to.opacity - from.opacity) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    fn navigate<S: RatingStore>(self, engine: &mut DeckEngine<S>) {
        match self {
            Self::Left => engine.next(),
            Self::Right => engine.previous(),
        }
    }
}

/// Result of classifying a released drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    Swipe(SwipeDirection),
    /// Indeterminate movement; the card snaps back.
    Cancel,
}

/// Classify a released drag by its displacement.
pub fn classify(dx: f32, dy: f32, config: &GestureConfig) -> GestureKind {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax < config.tap_threshold && ay < config.tap_threshold {
        GestureKind::Tap
    } else if ax > config.swipe_threshold && ax > ay {
        let direction = if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        };
        GestureKind::Swipe(direction)
    } else {
        GestureKind::Cancel
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub from: CardTransform,
    pub to: CardTransform,
    pub started_ms: u64,
    pub duration_ms: u64,
}

impl Animation {
    fn at(&self, now_ms: u64) -> CardTransform {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f32;
        CardTransform::lerp(self.from, self.to, elapsed / self.duration_ms as f32)
    }

    fn finished(&self, now_ms: u64) -> bool {
        now_ms >= self.started_ms + self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    Idle,
    Dragging { start_x: f32, start_y: f32 },
    AnimatingOut { direction: SwipeDirection, animation: Animation },
    /// Card is hidden; the next tick swaps in the new content.
    Swapping { direction: SwipeDirection },
    AnimatingIn { animation: Animation },
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Transform advanced; redraw.
    Frame,
    /// Card finished flying out and is now hidden.
    Hidden,
    /// Deck moved while hidden.
    Swapped(SwipeDirection),
    /// Transition finished; input is accepted again.
    Settled,
}

/// Drag tracking and swipe transitions over a deck engine.
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GestureConfig,
    phase: TransitionPhase,
    transform: CardTransform,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: TransitionPhase::Idle,
            transform: CardTransform::NEUTRAL,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_fly_out_distance(&mut self, distance: f32) {
        self.config.fly_out_distance = distance;
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn transform(&self) -> CardTransform {
        self.transform
    }

    /// A swipe transition is running.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.phase,
            TransitionPhase::AnimatingOut { .. }
                | TransitionPhase::Swapping { .. }
                | TransitionPhase::AnimatingIn { .. }
        )
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, TransitionPhase::Dragging { .. })
    }

    /// Start a drag. Rejected while locked or when there is nothing to drag.
    pub fn begin<S: RatingStore>(&mut self, x: f32, y: f32, engine: &DeckEngine<S>) -> bool {
        if self.is_locked() || engine.is_empty() {
            return false;
        }
        self.phase = TransitionPhase::Dragging {
            start_x: x,
            start_y: y,
        };
        self.transform = CardTransform::NEUTRAL;
        true
    }

    /// Track pointer movement and return the preview transform.
    ///
    /// Returns `None` when not dragging or when the movement is a
    /// mostly-vertical scroll that the card should ignore.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Option<CardTransform> {
        let TransitionPhase::Dragging { start_x, start_y } = self.phase else {
            return None;
        };
        let dx = x - start_x;
        let dy = y - start_y;

        if dy.abs() > dx.abs() && dx.abs() < self.config.scroll_slop {
            return None;
        }

        self.transform = CardTransform {
            translate_x: dx,
            rotate_deg: dx * self.config.rotation_per_px,
            opacity: (1.0 - dx.abs() / self.config.opacity_falloff).max(self.config.opacity_floor),
        };
        Some(self.transform)
    }

    /// Finish a drag at `(x, y)`.
    ///
    /// A tap reveals immediately; a strong swipe starts the fly-out; anything
    /// else snaps back. Returns `None` when no drag was in progress.
    pub fn end<S: RatingStore>(
        &mut self,
        x: f32,
        y: f32,
        now_ms: u64,
        engine: &mut DeckEngine<S>,
    ) -> Option<GestureKind> {
        let TransitionPhase::Dragging { start_x, start_y } = self.phase else {
            return None;
        };
        let kind = classify(x - start_x, y - start_y, &self.config);

        match kind {
            GestureKind::Tap => {
                self.settle();
                engine.reveal();
            }
            GestureKind::Swipe(direction) => {
                let fly_out = CardTransform {
                    translate_x: direction.sign() * self.config.fly_out_distance,
                    rotate_deg: direction.sign() * self.config.fly_out_rotation,
                    opacity: 0.0,
                };
                tracing::trace!(?direction, "swipe committed");
                self.phase = TransitionPhase::AnimatingOut {
                    direction,
                    animation: Animation {
                        from: self.transform,
                        to: fly_out,
                        started_ms: now_ms,
                        duration_ms: self.config.animate_out_ms,
                    },
                };
            }
            GestureKind::Cancel => self.settle(),
        }
        Some(kind)
    }

    /// Abandon an in-progress drag. Running transitions are not affected.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            self.settle();
        }
    }

    /// Drop any drag or running transition without navigating. Used when
    /// the deck underneath is replaced.
    pub fn reset(&mut self) {
        if self.phase != TransitionPhase::Idle {
            tracing::debug!(phase = ?self.phase, "gesture state reset");
        }
        self.settle();
    }

    /// Advance the running transition to `now_ms`.
    pub fn tick<S: RatingStore>(
        &mut self,
        now_ms: u64,
        engine: &mut DeckEngine<S>,
    ) -> Option<TransitionEvent> {
        match self.phase {
            TransitionPhase::Idle | TransitionPhase::Dragging { .. } => None,
            TransitionPhase::AnimatingOut {
                direction,
                animation,
            } => {
                if animation.finished(now_ms) {
                    self.phase = TransitionPhase::Swapping { direction };
                    self.transform = CardTransform::HIDDEN;
                    Some(TransitionEvent::Hidden)
                } else {
                    self.transform = animation.at(now_ms);
                    Some(TransitionEvent::Frame)
                }
            }
            TransitionPhase::Swapping { direction } => {
                direction.navigate(engine);
                let animation = Animation {
                    from: CardTransform::HIDDEN,
                    to: CardTransform::NEUTRAL,
                    started_ms: now_ms,
                    duration_ms: self.config.animate_in_ms,
                };
                self.phase = TransitionPhase::AnimatingIn { animation };
                self.transform = animation.from;
                Some(TransitionEvent::Swapped(direction))
            }
            TransitionPhase::AnimatingIn { animation } => {
                if animation.finished(now_ms) {
                    self.settle();
                    Some(TransitionEvent::Settled)
                } else {
                    self.transform = animation.at(now_ms);
                    Some(TransitionEvent::Frame)
                }
            }
        }
    }

    fn settle(&mut self) {
        self.phase = TransitionPhase::Idle;
        self.transform = CardTransform::NEUTRAL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::MemoryRatingStore;
    use crate::types::{Rating, WordRecord};
    use pretty_assertions::assert_eq;

    fn engine(n: usize) -> DeckEngine<MemoryRatingStore> {
        let mut engine = DeckEngine::new(MemoryRatingStore::new());
        engine.load(
            (0..n)
                .map(|i| WordRecord::new(format!("w{i}"), Rating::MIN))
                .collect(),
        );
        engine
    }

    /// Drive ticks until the controller is idle again.
    fn run_to_idle(
        gestures: &mut GestureController,
        engine: &mut DeckEngine<MemoryRatingStore>,
        mut now: u64,
    ) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        while gestures.phase() != TransitionPhase::Idle {
            now += 50;
            if let Some(event) = gestures.tick(now, engine) {
                events.push(event);
            }
            assert!(events.len() < 100, "transition never settled");
        }
        events
    }

    #[test]
    fn classification() {
        let config = GestureConfig::default();
        assert_eq!(classify(0.0, 0.0, &config), GestureKind::Tap);
        assert_eq!(classify(14.0, -14.0, &config), GestureKind::Tap);
        assert_eq!(classify(15.0, 0.0, &config), GestureKind::Cancel);
        assert_eq!(classify(60.0, 5.0, &config), GestureKind::Cancel);
        assert_eq!(
            classify(-101.0, 20.0, &config),
            GestureKind::Swipe(SwipeDirection::Left)
        );
        assert_eq!(
            classify(150.0, 0.0, &config),
            GestureKind::Swipe(SwipeDirection::Right)
        );
        // Long diagonal dominated by vertical movement is not a swipe.
        assert_eq!(classify(120.0, 200.0, &config), GestureKind::Cancel);
    }

    #[test]
    fn drag_preview_transform() {
        let engine = engine(3);
        let mut gestures = GestureController::default();
        assert!(gestures.begin(100.0, 100.0, &engine));

        let t = gestures.drag_to(160.0, 110.0).unwrap();
        assert_eq!(t.translate_x, 60.0);
        assert!((t.rotate_deg - 6.0).abs() < 1e-4);
        assert!((t.opacity - 0.8).abs() < 1e-4);

        let far = gestures.drag_to(-500.0, 100.0).unwrap();
        assert_eq!(far.opacity, 0.5);
    }

    #[test]
    fn vertical_scroll_passes_through() {
        let engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        assert_eq!(gestures.drag_to(10.0, 80.0), None);
        assert!(gestures.transform().is_neutral());
    }

    #[test]
    fn drag_without_begin_is_ignored() {
        let mut gestures = GestureController::default();
        assert_eq!(gestures.drag_to(50.0, 0.0), None);
        let mut engine = engine(2);
        assert_eq!(gestures.end(50.0, 0.0, 0, &mut engine), None);
    }

    #[test]
    fn tap_reveals_and_stays_idle() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(10.0, 10.0, &engine);
        gestures.drag_to(14.0, 12.0);

        assert_eq!(gestures.end(14.0, 12.0, 0, &mut engine), Some(GestureKind::Tap));
        assert!(engine.is_revealed());
        assert_eq!(engine.position(), 0);
        assert_eq!(gestures.phase(), TransitionPhase::Idle);
        assert!(gestures.transform().is_neutral());
    }

    #[test]
    fn weak_drag_snaps_back() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        gestures.drag_to(70.0, 0.0);

        assert_eq!(gestures.end(70.0, 0.0, 0, &mut engine), Some(GestureKind::Cancel));
        assert_eq!(engine.position(), 0);
        assert!(!engine.is_revealed());
        assert!(gestures.transform().is_neutral());
    }

    #[test]
    fn left_swipe_runs_full_transition_and_advances_once() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(300.0, 0.0, &engine);
        gestures.drag_to(150.0, 0.0);
        assert_eq!(
            gestures.end(150.0, 0.0, 1_000, &mut engine),
            Some(GestureKind::Swipe(SwipeDirection::Left))
        );
        assert!(gestures.is_locked());
        assert_eq!(engine.position(), 0, "no navigation before the card is hidden");

        let events = run_to_idle(&mut gestures, &mut engine, 1_000);
        let key_events: Vec<_> = events
            .into_iter()
            .filter(|e| *e != TransitionEvent::Frame)
            .collect();
        assert_eq!(
            key_events,
            vec![
                TransitionEvent::Hidden,
                TransitionEvent::Swapped(SwipeDirection::Left),
                TransitionEvent::Settled,
            ]
        );
        assert_eq!(engine.position(), 1);
        assert!(!gestures.is_locked());
        assert!(gestures.transform().is_neutral());
    }

    #[test]
    fn right_swipe_goes_back() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        gestures.end(120.0, 10.0, 0, &mut engine);
        run_to_idle(&mut gestures, &mut engine, 0);
        assert_eq!(engine.position(), 2);
    }

    #[test]
    fn phases_progress_in_order() {
        let mut engine = engine(2);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        gestures.end(-200.0, 0.0, 0, &mut engine);
        assert!(matches!(gestures.phase(), TransitionPhase::AnimatingOut { .. }));

        assert_eq!(gestures.tick(100, &mut engine), Some(TransitionEvent::Frame));
        assert!(gestures.transform().translate_x < 0.0);

        assert_eq!(gestures.tick(300, &mut engine), Some(TransitionEvent::Hidden));
        assert!(matches!(gestures.phase(), TransitionPhase::Swapping { .. }));
        assert_eq!(gestures.transform().opacity, 0.0);

        assert_eq!(
            gestures.tick(301, &mut engine),
            Some(TransitionEvent::Swapped(SwipeDirection::Left))
        );
        assert!(matches!(gestures.phase(), TransitionPhase::AnimatingIn { .. }));

        // Fade-in takes as long as the fly-out.
        assert_eq!(gestures.tick(600, &mut engine), Some(TransitionEvent::Frame));
        assert!(gestures.transform().opacity < 1.0);
        assert_eq!(gestures.tick(601, &mut engine), Some(TransitionEvent::Settled));
        assert_eq!(gestures.phase(), TransitionPhase::Idle);
        assert_eq!(gestures.tick(700, &mut engine), None);
    }

    #[test]
    fn lock_rejects_new_gestures() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        gestures.end(-200.0, 0.0, 0, &mut engine);

        assert!(!gestures.begin(0.0, 0.0, &engine));
        assert_eq!(gestures.drag_to(-50.0, 0.0), None);
        assert_eq!(gestures.end(0.0, 0.0, 10, &mut engine), None);
        assert!(!engine.is_revealed());

        gestures.cancel();
        assert!(gestures.is_locked(), "cancel never aborts a transition");
    }

    #[test]
    fn empty_deck_rejects_gestures() {
        let mut engine = engine(0);
        let mut gestures = GestureController::default();
        assert!(!gestures.begin(0.0, 0.0, &engine));
        assert_eq!(gestures.end(0.0, 0.0, 0, &mut engine), None);
        assert!(!engine.is_revealed());
    }

    #[test]
    fn cancel_resets_drag() {
        let engine = engine(2);
        let mut gestures = GestureController::default();
        gestures.begin(0.0, 0.0, &engine);
        gestures.drag_to(60.0, 0.0);
        gestures.cancel();
        assert_eq!(gestures.phase(), TransitionPhase::Idle);
        assert!(gestures.transform().is_neutral());
    }

    #[test]
    fn reset_abandons_running_transition() {
        let mut engine = engine(3);
        let mut gestures = GestureController::default();
        gestures.begin(300.0, 0.0, &engine);
        gestures.end(100.0, 0.0, 0, &mut engine);
        assert!(gestures.is_locked());

        gestures.reset();
        assert_eq!(gestures.phase(), TransitionPhase::Idle);
        assert!(gestures.transform().is_neutral());
        assert_eq!(gestures.tick(1_000, &mut engine), None);
        assert_eq!(engine.position(), 0);
    }
}
