//! Conversion from crossterm events to viewer input.

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use deck_core::Key;
use std::time::Duration;

/// Approximate pixel size of one terminal cell, so gesture thresholds keep
/// their meaning on a character grid.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Pointer action on the card surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Drag { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    Pointer(PointerEvent),
    Resize(u16, u16),
    /// Ctrl-C; always quits.
    Interrupt,
    None,
}

pub fn cell_to_px(column: u16, row: u16) -> (f32, f32) {
    (column as f32 * CELL_WIDTH_PX, row as f32 * CELL_HEIGHT_PX)
}

pub fn convert_key_event(event: KeyEvent) -> InputEvent {
    if event.kind != KeyEventKind::Press {
        return InputEvent::None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return InputEvent::Interrupt;
    }

    let key = match event.code {
        KeyCode::Right => Key::Right,
        KeyCode::Left => Key::Left,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => return InputEvent::None,
    };
    InputEvent::Key(key)
}

pub fn convert_mouse_event(event: MouseEvent) -> InputEvent {
    let (x, y) = cell_to_px(event.column, event.row);
    let pointer = match event.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerEvent::Down { x, y },
        MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Drag { x, y },
        MouseEventKind::Up(MouseButton::Left) => PointerEvent::Up { x, y },
        _ => return InputEvent::None,
    };
    InputEvent::Pointer(pointer)
}

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if !poll(timeout)? {
        return Ok(None);
    }
    let event = match read()? {
        CrosstermEvent::Key(key) => convert_key_event(key),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    };
    Ok(Some(event))
}
