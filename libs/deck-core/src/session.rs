//! Viewing session: the single entry point for keyboard and pointer input.
//!
//! Both input sources reach the deck engine only through this type, so
//! reveal state and position stay consistent whichever source drove them.
//! Keyboard deck commands are dropped while a swipe transition holds the
//! gesture lock.

use crate::engine::DeckEngine;
use crate::feed::LoadOutcome;
use crate::gesture::{GestureConfig, GestureController, GestureKind, TransitionEvent};
use crate::input::{command_for, Command, Key};
use crate::rating::RatingStore;
use crate::view::{DeckView, Screen, SettingsView};

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    Reload,
    Quit,
}

#[derive(Debug)]
pub struct Session<S> {
    engine: DeckEngine<S>,
    gestures: GestureController,
    settings_open: bool,
    update_banner: bool,
    load_failure: Option<String>,
    data_version: Option<String>,
    dirty: bool,
}

impl<S: RatingStore> Session<S> {
    pub fn new(store: S, config: GestureConfig) -> Self {
        Self {
            engine: DeckEngine::new(store),
            gestures: GestureController::new(config),
            settings_open: false,
            update_banner: false,
            load_failure: None,
            data_version: None,
            dirty: true,
        }
    }

    /// Initialize the deck from freshly loaded data.
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        tracing::info!(
            words = outcome.words.len(),
            version = %outcome.version.version,
            "session loaded"
        );
        self.load_failure = None;
        self.update_banner = outcome.update_available;
        self.data_version = Some(outcome.version.version);
        self.gestures.reset();
        self.engine.load(outcome.words);
        self.dirty = true;
    }

    /// Record a load failure. The deck stays empty until a successful reload.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("load failed: {}", message);
        self.gestures.reset();
        self.engine.clear();
        self.load_failure = Some(message);
        self.dirty = true;
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match command_for(key, self.settings_open) {
            Some(command) => self.execute(command),
            None => KeyOutcome::Ignored,
        }
    }

    /// Run a command from any non-gesture source.
    pub fn execute(&mut self, command: Command) -> KeyOutcome {
        if command.touches_deck() && (self.settings_open || self.gestures.is_locked()) {
            return KeyOutcome::Ignored;
        }

        match command {
            Command::Next => self.engine.next(),
            Command::Previous => self.engine.previous(),
            Command::Reveal => {
                if self.engine.reveal().is_none() {
                    return KeyOutcome::Ignored;
                }
            }
            Command::Rate(rating) => match self.engine.rate(rating) {
                Ok(true) => {}
                Ok(false) => return KeyOutcome::Ignored,
                Err(e) => {
                    tracing::warn!("failed to save rating: {}", e);
                    return KeyOutcome::Ignored;
                }
            },
            Command::ToggleOrientation => self.engine.toggle_orientation(),
            Command::Shuffle => self.engine.shuffle(),
            Command::CycleFilter => self.engine.apply_filter(self.engine.filter().cycle()),
            Command::OpenSettings => self.settings_open = true,
            Command::CloseSettings => self.settings_open = false,
            Command::DismissBanner => self.update_banner = false,
            Command::Reload => return KeyOutcome::Reload,
            Command::Quit => return KeyOutcome::Quit,
        }
        self.dirty = true;
        KeyOutcome::Handled
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.settings_open {
            return false;
        }
        self.gestures.begin(x, y, &self.engine)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.gestures.drag_to(x, y).is_some() {
            self.dirty = true;
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, now_ms: u64) -> Option<GestureKind> {
        let kind = self.gestures.end(x, y, now_ms, &mut self.engine);
        if kind.is_some() {
            self.dirty = true;
        }
        kind
    }

    pub fn pointer_cancel(&mut self) {
        if self.gestures.is_dragging() {
            self.gestures.cancel();
            self.dirty = true;
        }
    }

    /// Advance animations; returns the transition event, if any.
    pub fn tick(&mut self, now_ms: u64) -> Option<TransitionEvent> {
        let event = self.gestures.tick(now_ms, &mut self.engine);
        if event.is_some() {
            self.dirty = true;
        }
        event
    }

    /// Whether a redraw is due; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn screen(&self) -> Screen {
        let deck = match &self.load_failure {
            Some(message) => DeckView::LoadFailed {
                message: message.clone(),
            },
            None => self.engine.view().with_transform(self.gestures.transform()),
        };
        let settings = self.settings_open.then(|| SettingsView {
            orientation: self.engine.orientation(),
            filter: self.engine.filter(),
            report: self.engine.report(),
            data_version: self.data_version.clone(),
        });

        Screen {
            deck,
            update_banner: self.update_banner,
            settings,
        }
    }

    pub fn engine(&self) -> &DeckEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DeckEngine<S> {
        &mut self.engine
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn gestures_mut(&mut self) -> &mut GestureController {
        &mut self.gestures
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn update_banner(&self) -> bool {
        self.update_banner
    }

    pub fn load_failure(&self) -> Option<&str> {
        self.load_failure.as_deref()
    }
}
