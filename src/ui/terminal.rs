//! A [`Canvas`] shown on the real terminal through ratatui and crossterm.

use std::io::{self, Stdout};
use std::sync::Once;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::renderer::{Canvas, Key, Renderer, TextStyle};
use crate::error::{Result, StatmonError};

static PANIC_HOOK: Once = Once::new();

/// Put the terminal back into cooked mode on the main screen. Safe to call
/// more than once.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the default hook prints the panic message.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            default_hook(info);
        }));
    });
}

/// Raw mode and the alternate screen for as long as it lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().map_err(|e| StatmonError::tui(format!("Failed to enable raw mode: {}", e)))?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .map_err(|e| StatmonError::tui(format!("Failed to enter alternate screen: {}", e)))?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

pub struct TerminalRenderer {
    canvas: Canvas,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    // Dropped last, after the terminal has flushed.
    _guard: TerminalGuard,
}

impl TerminalRenderer {
    pub fn new() -> Result<Self> {
        let guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)
            .map_err(|e| StatmonError::tui(format!("Failed to create terminal: {}", e)))?;
        terminal.clear()?;

        Ok(Self {
            canvas: Canvas::new(),
            terminal,
            _guard: guard,
        })
    }
}

impl Renderer for TerminalRenderer {
    fn write_field(&mut self, row: u16, col: u16, text: &str, style: TextStyle) {
        self.canvas.write_field(row, col, text, style);
    }

    fn clear_screen(&mut self) {
        self.canvas.clear_screen();
    }

    fn present(&mut self) -> Result<()> {
        let canvas = self.canvas.buffer();
        self.terminal.draw(|frame| {
            let area = frame.area().intersection(canvas.area);
            let target = frame.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let Some(cell) = canvas.cell((x, y)) {
                        target[(x, y)] = cell.clone();
                    }
                }
            }
        })?;
        Ok(())
    }

    fn get_key_non_blocking(&mut self) -> Result<Option<Key>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(key) = Key::from_event(key) {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    fn wait_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(key) = Key::from_event(key) {
                    return Ok(key);
                }
            }
        }
    }
}
