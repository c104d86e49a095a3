//! Boxed dialogs drawn over the dashboard, plus the boot and goodbye
//! screens.
//!
//! Dialogs wait for keys with [`Renderer::wait_key`]; while one is open no
//! tick runs. The caller redraws the whole dashboard afterwards.

use std::thread;
use std::time::Duration;

use crate::core::clock::ClockTime;
use crate::core::scheduler::{ForcedTiers, NextUpdate, Scheduler, Tier};
use crate::core::settings::{SettingField, Settings, SettingsEdit};
use crate::core::telemetry::{Field, TelemetryState};
use crate::error::Result;
use crate::ui::dashboard::commands::{forced_from_key, Diagnostic};
use crate::ui::formatters::{fit_width, format_mib};
use crate::ui::renderer::{
    Attr, Key, Palette, Renderer, TextStyle, SCREEN_HEIGHT, SCREEN_WIDTH,
};

const FRAME: TextStyle = TextStyle::new(Attr::Inverse, Palette::Blue);
const FRAME_TITLE: TextStyle = TextStyle::new(Attr::Bold, Palette::Blue);

/// A bordered, blanked rectangle with `title` centred in the top edge.
pub fn draw_box<R: Renderer + ?Sized>(
    renderer: &mut R,
    top: u16,
    left: u16,
    height: u16,
    width: u16,
    title: &str,
    frame: TextStyle,
) {
    let inner = width.saturating_sub(2) as usize;
    let edge = format!("+{}+", "-".repeat(inner));
    renderer.write_field(top, left, &edge, frame);
    renderer.write_field(top + height - 1, left, &edge, frame);
    for row in top + 1..top + height - 1 {
        renderer.write_field(row, left, "|", frame);
        renderer.write_field(row, left + 1, &" ".repeat(inner), TextStyle::NORMAL);
        renderer.write_field(row, left + width - 1, "|", frame);
    }
    if !title.is_empty() {
        let title = format!(" {} ", title);
        let col = left + (width.saturating_sub(title.len() as u16)) / 2;
        renderer.write_field(top, col, &title, FRAME_TITLE);
    }
}

fn lines<R: Renderer + ?Sized>(renderer: &mut R, top: u16, col: u16, lines: &[&str]) {
    for (i, line) in lines.iter().enumerate() {
        renderer.write_field(top + i as u16, col, line, TextStyle::NORMAL);
    }
}

/// Show a short banner for `pause`.
fn banner<R: Renderer + ?Sized>(
    renderer: &mut R,
    text: &str,
    color: Palette,
    pause: Duration,
) -> Result<()> {
    let width = text.len() as u16 + 4;
    let left = (SCREEN_WIDTH - width) / 2;
    let style = TextStyle::new(Attr::Inverse, color);
    draw_box(renderer, 17, left, 5, width, "", style);
    renderer.write_field(19, left + 2, text, style);
    renderer.present()?;
    if !pause.is_zero() {
        thread::sleep(pause);
    }
    Ok(())
}

pub fn help<R: Renderer + ?Sized>(renderer: &mut R) -> Result<()> {
    draw_box(renderer, 12, 6, 16, 48, "Help Menu", FRAME);
    lines(
        renderer,
        14,
        8,
        &[
            "Press 'q' or 'x' to exit the program",
            "Press 'h' to bring up this menu",
            "Press 'i' to change the update intervals",
            "Press 'v' to see program info and version",
            "Press 'u' to update a data group",
            "Press 'U' to update all data",
            "Press 'd' to redraw the entire screen",
            "Press 't' to see and use test functions",
            "",
            "Pressing any of these keys now does nothing",
            "Press any key to close this box, then press",
            "the key you want",
        ],
    );
    renderer.present()?;
    renderer.wait_key()?;
    Ok(())
}

/// Ask which tier group to refresh.
pub fn force_update_menu<R: Renderer + ?Sized>(
    renderer: &mut R,
    semi_interval_mins: u32,
) -> Result<ForcedTiers> {
    draw_box(renderer, 13, 6, 14, 48, "Force Update", FRAME);
    let semi = format!("1) SemiOften (updated every {} minutes)", semi_interval_mins);
    lines(
        renderer,
        15,
        8,
        &[
            "Which data group would you like to update?",
            &semi,
            "  >IPs, Internet access, outbreak numbers",
            "2) Daily (updated daily)",
            "  >OS Updates",
            "3) Static (updated at program startup)",
            "  >Hostname, Kernel, MAC addresses",
            "4) All",
            "",
            "Please enter the number of the update group",
        ],
    );
    renderer.present()?;
    let forced = forced_from_key(renderer.wait_key()?);
    log::info!("Forced update: {:?}", forced);
    Ok(forced)
}

/// Result of the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    Saved(Settings),
    Canceled,
    Unchanged,
}

/// Read up to `width` characters at (`row`, `col`) until Enter. Esc and
/// Ctrl-C read as the cancel letter.
fn read_field<R: Renderer + ?Sized>(
    renderer: &mut R,
    row: u16,
    col: u16,
    width: usize,
) -> Result<String> {
    let mut text = String::new();
    loop {
        renderer.write_field(
            row,
            col,
            &format!("{}{}", text, "_".repeat(width - text.chars().count())),
            TextStyle::new(Attr::Underline, Palette::Default),
        );
        renderer.present()?;
        match renderer.wait_key()? {
            Key::Enter => return Ok(text),
            Key::Esc | Key::Interrupt => return Ok("c".to_string()),
            Key::Backspace => {
                text.pop();
            }
            Key::Char(c) if text.chars().count() < width => text.push(c),
            _ => {}
        }
    }
}

/// Edit the three cadences. Nothing is applied unless the user confirms.
pub fn settings_dialog<R: Renderer + ?Sized>(
    renderer: &mut R,
    current: Settings,
    pause: Duration,
) -> Result<SettingsOutcome> {
    draw_box(renderer, 8, 7, 24, 46, "Interval", FRAME);
    let tick = format!("Current: {}s | Min: 1 - Max: 59", current.tick_interval_secs);
    let semi = format!("Current: {}m | Min: 1 - Max: 1420", current.semi_interval_mins);
    let speed = format!("Current: once every {} time(s)", current.speedtest_every);
    lines(
        renderer,
        10,
        9,
        &[
            "Set new update interval in seconds.",
            &tick,
            "",
            "",
            "Interval: __ seconds",
            "",
            "Set new semi-often interval in minutes.",
            &semi,
            "",
            "Semi Interval: ____ minutes",
            "",
            "Set when internet speed is calculated",
            &speed,
            "",
            "Once every _ time(s) semi-often runs.",
            "",
            "Input starts at first field, press enter",
            "to select next field. Leave empty to keep",
            "old value. Enter 'c' to cancel without",
            "saving.",
        ],
    );

    let slots = [
        (SettingField::TickInterval, 14, 19, 2),
        (SettingField::SemiInterval, 19, 24, 4),
        (SettingField::SpeedtestEvery, 24, 20, 1),
    ];
    let mut inputs = Vec::with_capacity(slots.len());
    for (field, row, col, width) in slots {
        let input = read_field(renderer, row, col, width)?;
        if input.trim() == "c" {
            banner(renderer, "CANCELED", Palette::Red, pause)?;
            return Ok(SettingsOutcome::Canceled);
        }
        inputs.push((field, input));
    }

    let mut edit = SettingsEdit::new(current);
    for (field, input) in &inputs {
        if !edit.submit(*field, input) && !input.trim().is_empty() {
            log::info!("Rejected {} value {:?}", field.label(), input);
        }
    }

    if !edit.has_changes() {
        draw_box(renderer, 17, 18, 6, 24, "", FRAME);
        renderer.write_field(19, 20, "No changes were made", TextStyle::NORMAL);
        renderer.write_field(20, 21, "Returning to home", TextStyle::NORMAL);
        renderer.present()?;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
        return Ok(SettingsOutcome::Unchanged);
    }

    let changes = edit.changes().to_vec();
    let height = changes.len() as u16 + 6;
    let top = (SCREEN_HEIGHT - height) / 2;
    draw_box(renderer, top, 9, height, 42, "Interval Value Check", FRAME);
    for (i, change) in changes.iter().enumerate() {
        renderer.write_field(
            top + 2 + i as u16,
            11,
            &format!("Changed {} from {} to {}", change.field.label(), change.old, change.new),
            TextStyle::NORMAL,
        );
    }
    renderer.write_field(
        top + 3 + changes.len() as u16,
        11,
        "Press 'c' to cancel, press 's' to save",
        TextStyle::NORMAL,
    );
    renderer.present()?;

    loop {
        match renderer.wait_key()? {
            Key::Char('s') => {
                let saved = edit.commit();
                log::info!("Settings saved: {:?}", saved);
                banner(renderer, "CHANGES  SAVED", Palette::Green, pause)?;
                return Ok(SettingsOutcome::Saved(saved));
            }
            Key::Char('c') | Key::Esc | Key::Interrupt => {
                edit.cancel();
                banner(renderer, "CANCELED", Palette::Red, pause)?;
                return Ok(SettingsOutcome::Canceled);
            }
            _ => {}
        }
    }
}

pub fn version<R: Renderer + ?Sized>(renderer: &mut R, version: &str) -> Result<()> {
    draw_box(renderer, 11, 4, 18, 52, "Program Info and Version", FRAME);
    renderer.write_field(13, 6, "Statmon Status Monitor V", TextStyle::NORMAL);
    renderer.write_field(13, 30, version, FRAME_TITLE);
    let built = format!(
        "Built for {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    lines(
        renderer,
        14,
        6,
        &[
            "Host health and network status at a glance",
            "Made for a small screen (60x40 chars)",
            "Keyboard only, mouse/touch not supported",
            &built,
            "",
            "Static info is read at startup, package",
            "updates once a day, network status every",
            "few minutes and everything else each tick.",
            "",
            "Press any key to close this box",
        ],
    );
    renderer.present()?;
    renderer.wait_key()?;
    Ok(())
}

/// Ask which diagnostic to run.
pub fn diagnostics_menu<R: Renderer + ?Sized>(renderer: &mut R) -> Result<Option<Diagnostic>> {
    draw_box(renderer, 14, 12, 12, 36, "Test Functions", FRAME);
    lines(
        renderer,
        16,
        14,
        &[
            "1) Style test",
            "  > Prints colours and effects",
            "2) Show all info",
            "  > Shows all info unformatted",
            "3) Fill screen",
            "  > Fills the screen with chars",
            "",
            "Enter the number of the function",
        ],
    );
    renderer.present()?;
    Ok(Diagnostic::from_key(renderer.wait_key()?))
}

/// Every attribute in every palette colour.
pub fn style_test<R: Renderer + ?Sized>(renderer: &mut R) {
    renderer.clear_screen();
    for (i, attr) in Attr::ALL.iter().enumerate() {
        let row = 2 + i as u16;
        let name = format!("{} text", attr.label());
        renderer.write_field(row, 1, &name, TextStyle::new(*attr, Palette::Default));
        let mut col = 17;
        for color in Palette::ALL.iter().skip(1) {
            let tag = format!(" #{}#", color.tag());
            renderer.write_field(row, col, &tag, TextStyle::new(*attr, *color));
            col += tag.len() as u16;
        }
    }
}

/// Values the raw dump shows besides the telemetry fields.
#[derive(Debug, Clone, Copy)]
pub struct InfoContext<'a> {
    pub telemetry: &'a TelemetryState,
    pub scheduler: &'a Scheduler,
    pub settings: Settings,
    pub now: ClockTime,
    pub next: Option<NextUpdate>,
    pub regions: usize,
    pub version: &'a str,
    pub test_mode: bool,
}

/// Every field and scheduler value, unformatted.
pub fn show_all_info<R: Renderer + ?Sized>(renderer: &mut R, info: &InfoContext<'_>) {
    renderer.clear_screen();
    let mut lines: Vec<String> = Field::all(info.regions)
        .into_iter()
        .map(|f| format!("{}: {}", f.key(), info.telemetry.display(f)))
        .collect();

    if let Some(total) = info.telemetry.get(Field::MemTotal).and_then(|v| v.as_i64()) {
        lines.push(format!("mem_total (human): {}", format_mib(total)));
    }
    for tier in [Tier::Static, Tier::Daily, Tier::SemiOften] {
        let last = info
            .scheduler
            .last_run(tier)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "never".to_string());
        lines.push(format!("last_run {}: {}", tier, last));
    }
    let cadence = info.scheduler.speed_cadence();
    lines.push(format!("now: {}", info.now));
    lines.push(format!("interval: {}s", info.settings.tick_interval_secs));
    lines.push(format!("semi_interval: {}m", info.settings.semi_interval_mins));
    lines.push(format!("speedtest: {}/{}", cadence.count(), cadence.every()));
    lines.push(match info.next {
        Some(next) => format!("next_update: {} in {}m", next.tier, next.minutes),
        None => "next_update: --".to_string(),
    });
    lines.push(format!("version: {}  test_mode: {}", info.version, info.test_mode));

    for (i, line) in lines.iter().take((SCREEN_HEIGHT - 1) as usize).enumerate() {
        renderer.write_field(
            1 + i as u16,
            0,
            &fit_width(line, SCREEN_WIDTH as usize),
            TextStyle::NORMAL,
        );
    }
}

/// A border of `*` around `#`.
pub fn fill_screen<R: Renderer + ?Sized>(renderer: &mut R) {
    renderer.clear_screen();
    let width = SCREEN_WIDTH as usize;
    let edge = "*".repeat(width);
    let body = format!("*{}*", "#".repeat(width - 2));
    renderer.write_field(0, 0, &edge, TextStyle::NORMAL);
    for row in 1..SCREEN_HEIGHT - 1 {
        renderer.write_field(row, 0, &body, TextStyle::NORMAL);
    }
    renderer.write_field(SCREEN_HEIGHT - 1, 0, &edge, TextStyle::NORMAL);
}

pub fn boot_header<R: Renderer + ?Sized>(renderer: &mut R) {
    renderer.clear_screen();
    renderer.write_field(
        1,
        0,
        &format!("{} > > > > > Statmon Status Monitor < < < < < ", " ".repeat(6)),
        TextStyle::BOLD,
    );
}

fn boot_row(tier: Tier) -> u16 {
    match tier {
        Tier::Static => 4,
        Tier::Daily => 6,
        Tier::SemiOften => 8,
        Tier::Often => 10,
    }
}

/// Announce a startup tier run.
pub fn boot_step_started<R: Renderer + ?Sized>(renderer: &mut R, tier: Tier) -> Result<()> {
    renderer.write_field(
        boot_row(tier),
        0,
        &format!(">>> Running {} update... ", tier),
        TextStyle::NORMAL,
    );
    renderer.present()
}

/// Report how a startup tier run went.
pub fn boot_step_finished<R: Renderer + ?Sized>(renderer: &mut R, tier: Tier, ok: bool) -> Result<()> {
    let prefix = format!(">>> Running {} update... ", tier);
    let (text, color) = if ok {
        ("SUCCESS", Palette::Green)
    } else {
        ("FAILURE", Palette::Red)
    };
    renderer.write_field(
        boot_row(tier),
        prefix.len() as u16,
        text,
        TextStyle::new(Attr::Bold, color),
    );
    renderer.present()
}

/// Tell the user some startup fields failed and wait for a key.
pub fn boot_warning<R: Renderer + ?Sized>(renderer: &mut R) -> Result<()> {
    renderer.write_field(
        37,
        0,
        ">>> Warning: error detected while executing one or more",
        TextStyle::ATTENTION,
    );
    renderer.write_field(38, 0, "updates. Press any key to continue", TextStyle::ATTENTION);
    renderer.present()?;
    renderer.wait_key()?;
    Ok(())
}

pub fn goodbye<R: Renderer + ?Sized>(renderer: &mut R, pause: Duration) -> Result<()> {
    renderer.clear_screen();
    for (i, line) in [
        "  _____                 _ _                ",
        " / ____|               | | |               ",
        "| |  __  ___   ___   __| | |__  _   _  ___ ",
        "| | |_ |/ _ \\ / _ \\ / _` | '_ \\| | | |/ _ \\",
        "| |__| | (_) | (_) | (_| | |_) | |_| |  __/",
        " \\_____|\\___/ \\___/ \\__,_|_.__/ \\__, |\\___|",
        "                                 __/ |     ",
        "                                |___/      ",
    ]
    .iter()
    .enumerate()
    {
        renderer.write_field(16 + i as u16, 8, line, TextStyle::BOLD);
    }
    renderer.present()?;
    if !pause.is_zero() {
        thread::sleep(pause);
    }
    Ok(())
}
