//! The drawing surface the dashboard writes to.
//!
//! Everything is addressed in fixed character cells on a 60x40 screen.
//! [`Canvas`] keeps the cells in memory and is what tests inspect;
//! [`crate::ui::terminal::TerminalRenderer`] puts a canvas on a real
//! terminal.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::error::{Result, StatmonError};

pub const SCREEN_WIDTH: u16 = 60;
pub const SCREEN_HEIGHT: u16 = 40;

/// The 8-entry colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Default,
        Palette::Red,
        Palette::Green,
        Palette::Yellow,
        Palette::Blue,
        Palette::Magenta,
        Palette::Cyan,
        Palette::White,
    ];

    /// Two-letter tag used by the style test screen.
    pub fn tag(self) -> &'static str {
        match self {
            Palette::Default => "DF",
            Palette::Red => "RE",
            Palette::Green => "GR",
            Palette::Yellow => "YE",
            Palette::Blue => "BL",
            Palette::Magenta => "MG",
            Palette::Cyan => "CY",
            Palette::White => "WH",
        }
    }

    fn color(self) -> Color {
        match self {
            Palette::Default => Color::Reset,
            Palette::Red => Color::Red,
            Palette::Green => Color::Green,
            Palette::Yellow => Color::Yellow,
            Palette::Blue => Color::Blue,
            Palette::Magenta => Color::Magenta,
            Palette::Cyan => Color::Cyan,
            Palette::White => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Normal,
    Bold,
    /// Draws the eye to a failed or out-of-range value
    Attention,
    Dim,
    Underline,
    Blink,
    Inverse,
}

impl Attr {
    pub const ALL: [Attr; 7] = [
        Attr::Normal,
        Attr::Bold,
        Attr::Attention,
        Attr::Dim,
        Attr::Underline,
        Attr::Blink,
        Attr::Inverse,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Attr::Normal => "Normal",
            Attr::Bold => "Bold",
            Attr::Attention => "Attention",
            Attr::Dim => "Dim",
            Attr::Underline => "Underline",
            Attr::Blink => "Blinking",
            Attr::Inverse => "Inverse",
        }
    }
}

/// An attribute combined with a palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub attr: Attr,
    pub color: Palette,
}

impl TextStyle {
    pub const NORMAL: TextStyle = TextStyle::new(Attr::Normal, Palette::Default);
    pub const BOLD: TextStyle = TextStyle::new(Attr::Bold, Palette::Default);
    pub const ATTENTION: TextStyle = TextStyle::new(Attr::Attention, Palette::Red);

    pub const fn new(attr: Attr, color: Palette) -> Self {
        Self { attr, color }
    }

    pub const fn colored(color: Palette) -> Self {
        Self::new(Attr::Normal, color)
    }

    pub fn to_style(self) -> Style {
        let style = Style::default().fg(self.color.color());
        match self.attr {
            Attr::Normal => style,
            Attr::Bold => style.add_modifier(Modifier::BOLD),
            Attr::Attention => style.add_modifier(Modifier::BOLD),
            Attr::Dim => style.add_modifier(Modifier::DIM),
            Attr::Underline => style.add_modifier(Modifier::UNDERLINED),
            Attr::Blink => style.add_modifier(Modifier::SLOW_BLINK),
            Attr::Inverse => style.add_modifier(Modifier::REVERSED),
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// A key press as the dashboard sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Esc,
    /// Ctrl-C; raw mode delivers it as a key instead of a signal
    Interrupt,
    Other,
}

impl Key {
    /// Translate a crossterm event; releases and repeats are dropped.
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let key = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            _ => Key::Other,
        };
        Some(key)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Enter => write!(f, "Enter"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Esc => write!(f, "Esc"),
            Key::Interrupt => write!(f, "^C"),
            Key::Other => write!(f, "?"),
        }
    }
}

pub trait Renderer {
    /// Write `text` starting at (`row`, `col`). Text past the right edge is
    /// dropped.
    fn write_field(&mut self, row: u16, col: u16, text: &str, style: TextStyle);

    fn clear_screen(&mut self);

    /// Make everything written so far visible.
    fn present(&mut self) -> Result<()>;

    /// The next pending key press, without waiting.
    fn get_key_non_blocking(&mut self) -> Result<Option<Key>>;

    /// Wait for a key press. Only modal dialogs use this.
    fn wait_key(&mut self) -> Result<Key>;
}

/// In-memory screen of styled cells.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: Buffer,
    keys: VecDeque<Key>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_size(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            keys: VecDeque::new(),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Queue key presses to be returned by the key methods, in order.
    pub fn push_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.keys.extend(keys);
    }

    pub fn push_str(&mut self, text: &str) {
        self.keys.extend(text.chars().map(|c| match c {
            '\n' => Key::Enter,
            c => Key::Char(c),
        }));
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    /// The text of one row, trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        let area = self.buffer.area;
        if row >= area.height {
            return String::new();
        }
        let line: String = (0..area.width)
            .filter_map(|x| self.buffer.cell((x, row)).map(|c| c.symbol().to_string()))
            .collect();
        line.trim_end().to_string()
    }

    /// All rows joined by newlines.
    pub fn text(&self) -> String {
        (0..self.buffer.area.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.buffer.area.height).any(|row| self.row_text(row).contains(needle))
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<Style> {
        self.buffer.cell((col, row)).map(|c| c.style())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Canvas {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl Renderer for Canvas {
    fn write_field(&mut self, row: u16, col: u16, text: &str, style: TextStyle) {
        let area = self.buffer.area;
        if row >= area.height || col >= area.width {
            return;
        }
        let room = (area.width - col) as usize;
        self.buffer
            .set_stringn(col, row, text, room, style.to_style());
    }

    fn clear_screen(&mut self) {
        self.buffer.reset();
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_key_non_blocking(&mut self) -> Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }

    fn wait_key(&mut self) -> Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| StatmonError::tui("no key available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let mut canvas = Canvas::new();
        canvas.write_field(3, 5, "Hostname: ", TextStyle::BOLD);
        canvas.write_field(3, 15, "pi", TextStyle::NORMAL);
        assert_eq!(canvas.row_text(3), "     Hostname: pi");
        assert!(canvas
            .style_at(3, 5)
            .is_some_and(|s| s.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn test_clipped_at_edges() {
        let mut canvas = Canvas::new();
        canvas.write_field(0, 55, "0123456789", TextStyle::NORMAL);
        canvas.write_field(40, 0, "off screen", TextStyle::NORMAL);
        assert_eq!(canvas.row_text(0), format!("{}01234", " ".repeat(55)));
    }

    #[test]
    fn test_clear_screen() {
        let mut canvas = Canvas::new();
        canvas.write_field(1, 1, "x", TextStyle::ATTENTION);
        canvas.clear_screen();
        assert_eq!(canvas, Canvas::new());
    }

    #[test]
    fn test_scripted_keys() {
        let mut canvas = Canvas::new();
        canvas.push_str("ab\n");
        assert_eq!(canvas.get_key_non_blocking().unwrap(), Some(Key::Char('a')));
        assert_eq!(canvas.wait_key().unwrap(), Key::Char('b'));
        assert_eq!(canvas.wait_key().unwrap(), Key::Enter);
        assert_eq!(canvas.get_key_non_blocking().unwrap(), None);
        assert!(canvas.wait_key().is_err());
    }

    #[test]
    fn test_key_from_event_ignores_release() {
        let mut event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(Key::from_event(event), Some(Key::Char('q')));
        event.kind = KeyEventKind::Release;
        assert_eq!(Key::from_event(event), None);
    }
}
