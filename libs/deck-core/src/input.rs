//! Keyboard mapping.
//!
//! | Key       | Command                 |
//! |-----------|-------------------------|
//! | →         | next card               |
//! | ←         | previous card           |
//! | Space     | reveal                  |
//! | 1-5       | rate and advance        |
//! | m         | toggle orientation      |
//! | s         | shuffle                 |
//! | f         | cycle filter            |
//! | o         | open settings           |
//! | Esc       | close settings          |
//! | r         | reload data             |
//! | x         | dismiss update banner   |
//! | q         | quit                    |

use crate::types::Rating;

/// Terminal-independent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Right,
    Left,
    Space,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Reveal,
    Rate(Rating),
    ToggleOrientation,
    Shuffle,
    CycleFilter,
    OpenSettings,
    CloseSettings,
    Reload,
    DismissBanner,
    Quit,
}

impl Command {
    /// Commands that read or mutate the deck.
    pub fn touches_deck(self) -> bool {
        matches!(
            self,
            Self::Next
                | Self::Previous
                | Self::Reveal
                | Self::Rate(_)
                | Self::ToggleOrientation
                | Self::Shuffle
                | Self::CycleFilter
        )
    }
}

/// Map a key press to a command.
///
/// While the settings overlay is open only closing it and quitting are
/// honored.
pub fn command_for(key: Key, settings_open: bool) -> Option<Command> {
    if settings_open {
        return match key {
            Key::Escape | Key::Char('o') => Some(Command::CloseSettings),
            Key::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    match key {
        Key::Right => Some(Command::Next),
        Key::Left => Some(Command::Previous),
        Key::Space => Some(Command::Reveal),
        Key::Char(c @ '1'..='5') => c
            .to_digit(10)
            .and_then(|d| Rating::from_value(d as u8))
            .map(Command::Rate),
        Key::Char('m') => Some(Command::ToggleOrientation),
        Key::Char('s') => Some(Command::Shuffle),
        Key::Char('f') => Some(Command::CycleFilter),
        Key::Char('o') => Some(Command::OpenSettings),
        Key::Char('r') => Some(Command::Reload),
        Key::Char('x') => Some(Command::DismissBanner),
        Key::Char('q') => Some(Command::Quit),
        Key::Escape | Key::Char(_) => None,
    }
}
