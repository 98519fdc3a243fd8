//! Terminal render surface.
//!
//! Draws a [`Screen`] snapshot onto a character grid with crossterm. The card
//! follows the gesture transform horizontally; rotation has no cell
//! equivalent and is not drawn.

pub mod events;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use deck_core::{CardTransform, CardView, DeckView, RenderSurface, Screen, SettingsView};
use std::io::{self, Write};

use events::CELL_WIDTH_PX;

pub const UPDATE_BANNER: &str = "New vocabulary available. Press r to reload, x to dismiss.";
const HELP: &str = "←/→ move  space reveal  1-5 rate  m direction  f filter  s shuffle  o settings  q quit";

const CARD_MAX_WIDTH: u16 = 56;
const CARD_HEIGHT: u16 = 11;
const SETTINGS_WIDTH: u16 = 40;

/// Below this opacity the card is not drawn at all.
const INVISIBLE_OPACITY: f32 = 0.05;
/// Below this opacity the card is drawn dim.
const DIM_OPACITY: f32 = 0.75;

pub struct TerminalSurface<W: Write> {
    out: W,
    width: u16,
    height: u16,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self { out, width, height }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print `text` starting at `col` (which may be off-screen), clipped to
    /// the terminal width.
    fn put(&mut self, col: i32, row: u16, text: &str) -> io::Result<()> {
        if row >= self.height {
            return Ok(());
        }
        if let Some((start, visible)) = clip(text, col, self.width) {
            queue!(self.out, MoveTo(start, row), Print(visible))?;
        }
        Ok(())
    }

    fn put_centered(&mut self, row: u16, text: &str) -> io::Result<()> {
        let col = (self.width as i32 - text.chars().count() as i32) / 2;
        self.put(col.max(0), row, text)
    }

    fn draw_header(&mut self, screen: &Screen) -> io::Result<()> {
        let status = match &screen.deck {
            DeckView::Card(card) => format!(
                "{}   filter: {}   {}",
                card.counter(),
                card.filter.as_str(),
                card.orientation.label()
            ),
            DeckView::Empty { filter, .. } => {
                format!("{}   filter: {}", screen.deck.counter(), filter.as_str())
            }
            DeckView::LoadFailed { .. } => screen.deck.counter(),
        };
        self.put(1, 0, &status)?;

        if screen.update_banner {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
            self.put_centered(1, UPDATE_BANNER)?;
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    fn draw_card(&mut self, card: &CardView) -> io::Result<()> {
        let transform: CardTransform = card.transform;
        if transform.opacity <= INVISIBLE_OPACITY {
            return Ok(());
        }

        let width = CARD_MAX_WIDTH.min(self.width.saturating_sub(4)).max(10);
        let inner = width as usize - 4;
        let offset = (transform.translate_x / CELL_WIDTH_PX).round() as i32;
        let left = (self.width as i32 - width as i32) / 2 + offset;
        let top = (self.height.saturating_sub(CARD_HEIGHT) / 2).max(2);

        if transform.opacity < DIM_OPACITY {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }

        let side = match card.visible {
            deck_core::Side::En => "EN",
            deck_core::Side::Cz => "CZ",
        };
        let bar = "─".repeat(width as usize - 2);
        let label = format!("┌─ {} {}┐", side, "─".repeat(width as usize - 7));
        self.put(left, top, &label)?;
        for row in 1..CARD_HEIGHT - 1 {
            let blank = format!("│{}│", " ".repeat(width as usize - 2));
            self.put(left, top + row, &blank)?;
        }
        self.put(left, top + CARD_HEIGHT - 1, &format!("└{}┘", bar))?;

        let face = card.visible_face();
        let centered = |text: &str| {
            let pad = inner.saturating_sub(text.chars().count()) / 2;
            left + 2 + pad as i32
        };

        queue!(self.out, SetAttribute(Attribute::Bold))?;
        let word: String = face.word.chars().take(inner).collect();
        self.put(centered(&word), top + 2, &word)?;
        queue!(self.out, SetAttribute(Attribute::NormalIntensity))?;

        if let Some(detail) = &face.detail {
            let detail: String = detail.chars().take(inner).collect();
            self.put(centered(&detail), top + 4, &detail)?;
        }

        if face.show_example {
            if let Some(example) = &face.example {
                queue!(self.out, SetAttribute(Attribute::Italic))?;
                for (i, line) in wrap(example, inner).iter().take(3).enumerate() {
                    self.put(centered(line), top + 6 + i as u16, line)?;
                }
                queue!(self.out, SetAttribute(Attribute::NoItalic))?;
            }
        }

        if !card.revealed {
            let hint = "tap or space to reveal";
            self.put(centered(hint), top + CARD_HEIGHT - 2, hint)?;
        }

        queue!(self.out, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn draw_settings(&mut self, settings: &SettingsView) -> io::Result<()> {
        let mut lines = vec![
            "Settings".to_string(),
            String::new(),
            format!("Direction:  {}", settings.orientation.label()),
            format!("Filter:     {}", settings.filter.as_str()),
            format!(
                "Data:       {}",
                settings.data_version.as_deref().unwrap_or("not loaded")
            ),
            String::new(),
            format!("Words:      {}", settings.report.total_words),
            format!("Unrated:    {}", settings.report.words_without_rating),
        ];
        for (rating, count) in &settings.report.rating_distribution {
            lines.push(format!("  ★{}        {}", rating, count));
        }
        lines.push(String::new());
        lines.push("Esc to close".to_string());

        let width = SETTINGS_WIDTH.min(self.width).max(10);
        let left = (self.width as i32 - width as i32) / 2;
        let top = self.height.saturating_sub(lines.len() as u16 + 2) / 2;
        let inner = width.saturating_sub(4) as usize;

        self.put(left, top, &format!("┌{}┐", "─".repeat(width as usize - 2)))?;
        for (i, line) in lines.iter().enumerate() {
            let text: String = line.chars().take(inner).collect();
            let padded = format!("│ {:<inner$} │", text, inner = inner);
            self.put(left, top + 1 + i as u16, &padded)?;
        }
        self.put(
            left,
            top + 1 + lines.len() as u16,
            &format!("└{}┘", "─".repeat(width as usize - 2)),
        )
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn render(&mut self, screen: &Screen) -> io::Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), Clear(ClearType::All))?;
        self.draw_header(screen)?;

        let middle = self.height / 2;
        match &screen.deck {
            DeckView::Card(card) => self.draw_card(card)?,
            DeckView::Empty { message, .. } => self.put_centered(middle, message)?,
            DeckView::LoadFailed { message } => {
                self.put_centered(middle, message)?;
                self.put_centered(middle + 1, "Press r to retry.")?;
            }
        }

        if let Some(settings) = &screen.settings {
            self.draw_settings(settings)?;
        }

        self.put(1, self.height.saturating_sub(1), HELP)?;
        self.out.flush()
    }
}

/// Clip `text` placed at `col` to the visible columns `0..width`.
/// Returns the on-screen start column and the visible part.
fn clip(text: &str, col: i32, width: u16) -> Option<(u16, String)> {
    let skip = if col < 0 { col.unsigned_abs() as usize } else { 0 };
    let start = col.max(0) as usize;
    if start >= width as usize {
        return None;
    }
    let visible: String = text.chars().skip(skip).take(width as usize - start).collect();
    if visible.is_empty() {
        None
    } else {
        Some((start as u16, visible))
    }
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{
        DeckEngine, FilterCriterion, MemoryRatingStore, Rating, RatingReport, WordRecord,
    };
    use pretty_assertions::assert_eq;

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    fn card_screen(revealed: bool) -> Screen {
        let mut engine = DeckEngine::new(MemoryRatingStore::new());
        engine.load(vec![WordRecord {
            en: "cat".to_string(),
            cz: Some("kočka".to_string()),
            pron: Some("kæt".to_string()),
            example: Some("The cat sleeps on the warm windowsill.".to_string()),
            meaning_en: None,
            rating: Rating::from_value(2).unwrap(),
        }]);
        if revealed {
            engine.reveal();
        }
        Screen {
            deck: engine.view(),
            update_banner: false,
            settings: None,
        }
    }

    #[test]
    fn renders_prompt_side_and_counter() {
        let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
        surface.render(&card_screen(false)).unwrap();
        let out = output(surface);
        assert!(out.contains("1 / 1  (★2)"));
        assert!(out.contains("cat"));
        assert!(out.contains("kæt"));
        assert!(!out.contains("kočka"));
        // Example belongs to the answer side.
        assert!(!out.contains("windowsill"));
    }

    #[test]
    fn renders_answer_side_with_example() {
        let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
        surface.render(&card_screen(true)).unwrap();
        let out = output(surface);
        assert!(out.contains("kočka"));
        assert!(out.contains("windowsill"));
        assert!(!out.contains("tap or space to reveal"));
    }

    #[test]
    fn hidden_card_is_not_drawn() {
        let mut screen = card_screen(false);
        screen.deck = screen.deck.with_transform(CardTransform::HIDDEN);
        let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
        surface.render(&screen).unwrap();
        let out = output(surface);
        assert!(!out.contains("┌─ EN"));
        assert!(out.contains("1 / 1"));
    }

    #[test]
    fn empty_deck_and_banner() {
        let screen = Screen {
            deck: DeckView::empty(FilterCriterion::Strong),
            update_banner: true,
            settings: None,
        };
        let mut surface = TerminalSurface::new(Vec::new(), 80, 24);
        surface.render(&screen).unwrap();
        let out = output(surface);
        assert!(out.contains("No cards match the filter."));
        assert!(out.contains(UPDATE_BANNER));
        assert!(out.contains("filter: strong"));
    }

    #[test]
    fn settings_overlay_lists_report() {
        let screen = Screen {
            deck: DeckView::empty(FilterCriterion::All),
            update_banner: false,
            settings: Some(SettingsView {
                orientation: deck_core::Orientation::PromptCz,
                filter: FilterCriterion::Weak,
                report: RatingReport::from_ratings([Rating::MIN, Rating::MAX]),
                data_version: Some("2024-05-01".to_string()),
            }),
        };
        let mut surface = TerminalSurface::new(Vec::new(), 80, 30);
        surface.render(&screen).unwrap();
        let out = output(surface);
        assert!(out.contains("CZ → EN"));
        assert!(out.contains("2024-05-01"));
        assert!(out.contains("Words:      2"));
        assert!(out.contains("Unrated:    1"));
    }

    #[test]
    fn clip_handles_offscreen_columns() {
        assert_eq!(clip("hello", -2, 10), Some((0, "llo".to_string())));
        assert_eq!(clip("hello", 7, 10), Some((7, "hel".to_string())));
        assert_eq!(clip("hello", 12, 10), None);
        assert_eq!(clip("hi", -5, 10), None);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("the quick brown fox", 10),
            vec!["the quick".to_string(), "brown fox".to_string()]
        );
        assert_eq!(wrap("", 10), Vec::<String>::new());
    }
}
