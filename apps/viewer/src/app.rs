//! Interactive event loop.

use crate::terminal::events::{poll_event, InputEvent, PointerEvent, CELL_WIDTH_PX};
use crate::terminal::TerminalSurface;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use deck_core::{KeyOutcome, RatingStore, RenderSurface, Session};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Poll interval while a transition is animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Poll interval when nothing is moving.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Raw mode, alternate screen and mouse capture for the lifetime of the
/// guard. Restored on drop, including on panic unwind.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Fly-out distance for a terminal `width` columns wide.
pub fn fly_out_distance(width: u16) -> f32 {
    width as f32 * CELL_WIDTH_PX
}

/// Route one input event into the session. Returns the outcome of key
/// presses so the caller can reload or quit.
pub fn dispatch<S, W>(
    session: &mut Session<S>,
    surface: &mut TerminalSurface<W>,
    event: InputEvent,
    now_ms: u64,
) -> KeyOutcome
where
    S: RatingStore,
    W: Write,
{
    match event {
        InputEvent::Key(key) => return session.handle_key(key),
        InputEvent::Interrupt => return KeyOutcome::Quit,
        InputEvent::Pointer(PointerEvent::Down { x, y }) => {
            session.pointer_down(x, y);
        }
        InputEvent::Pointer(PointerEvent::Drag { x, y }) => session.pointer_move(x, y),
        InputEvent::Pointer(PointerEvent::Up { x, y }) => {
            session.pointer_up(x, y, now_ms);
        }
        InputEvent::Resize(width, height) => {
            surface.resize(width, height);
            session
                .gestures_mut()
                .set_fly_out_distance(fly_out_distance(width));
            session.mark_dirty();
        }
        InputEvent::None => {}
    }
    KeyOutcome::Handled
}

/// Run until the user quits. `reload` is invoked for the reload command.
pub fn run_loop<S, W, F>(
    session: &mut Session<S>,
    surface: &mut TerminalSurface<W>,
    mut reload: F,
) -> io::Result<()>
where
    S: RatingStore,
    W: Write,
    F: FnMut(&mut Session<S>),
{
    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;

    loop {
        session.tick(now_ms());
        if session.take_dirty() {
            surface.render(&session.screen())?;
        }

        let timeout = if session.gestures().is_locked() {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        let Some(event) = poll_event(timeout)? else {
            continue;
        };

        match dispatch(session, surface, event, now_ms()) {
            KeyOutcome::Quit => break,
            KeyOutcome::Reload => {
                tracing::info!("reload requested");
                reload(session);
            }
            KeyOutcome::Handled | KeyOutcome::Ignored => {}
        }
    }

    tracing::info!("viewer closed");
    Ok(())
}
