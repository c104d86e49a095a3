//! Key bindings and what a handled command asks of the main loop.

use crate::core::scheduler::{ForcedTiers, Tier};
use crate::ui::input::Input;
use crate::ui::renderer::Key;

/// Actions reachable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask which tier group to refresh
    ForceUpdateMenu,
    ForceUpdateAll,
    ShowHelp,
    OpenSettings,
    ShowVersion,
    Redraw,
    /// Ask which diagnostic to run
    Diagnostics,
    Quit,
    None,
}

impl Command {
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Char('q') | Key::Char('x') | Key::Interrupt => Command::Quit,
            Key::Char('h') => Command::ShowHelp,
            Key::Char('i') => Command::OpenSettings,
            Key::Char('v') => Command::ShowVersion,
            Key::Char('u') => Command::ForceUpdateMenu,
            Key::Char('U') => Command::ForceUpdateAll,
            Key::Char('d') => Command::Redraw,
            Key::Char('t') => Command::Diagnostics,
            _ => Command::None,
        }
    }

    pub fn from_input(input: Input) -> Self {
        input.key().map_or(Command::None, Command::from_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Every attribute in every palette colour
    StyleTest,
    /// Raw dump of every field and scheduler value
    ShowAllInfo,
    /// Border of `*` around `#`
    FillScreen,
}

impl Diagnostic {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('1') => Some(Diagnostic::StyleTest),
            Key::Char('2') => Some(Diagnostic::ShowAllInfo),
            Key::Char('3') => Some(Diagnostic::FillScreen),
            _ => None,
        }
    }
}

/// Choice in the force-update menu; anything else forces nothing.
pub fn forced_from_key(key: Key) -> ForcedTiers {
    match key {
        Key::Char('1') => ForcedTiers::only(Tier::SemiOften),
        Key::Char('2') => ForcedTiers::only(Tier::Daily),
        Key::Char('3') => ForcedTiers::only(Tier::Static),
        Key::Char('4') => ForcedTiers::all(),
        _ => ForcedTiers::none(),
    }
}

/// What the main loop does after a command was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub forced: ForcedTiers,
    pub full_redraw: bool,
    pub quit: bool,
}

impl Outcome {
    pub fn redraw() -> Self {
        Self {
            full_redraw: true,
            ..Self::default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }
}
