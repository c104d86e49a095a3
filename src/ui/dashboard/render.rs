//! Screen layout and the render dispatcher.
//!
//! Every value is written into a fixed-width slot, so writing a snapshot
//! over an older one leaves no stale characters behind and rendering the
//! same snapshot twice gives the same screen.

use crate::core::collectors::{ESTABLISHED, NO_INTERNET};
use crate::core::scheduler::{NextUpdate, Tier};
use crate::core::settings::Settings;
use crate::core::telemetry::{Field, FieldError, FieldValue, TelemetryState, PLACEHOLDER};
use crate::ui::formatters::{fit_width, percent, right_align};
use crate::ui::renderer::{Attr, Palette, Renderer, TextStyle};

/// The first regions that fit in the outbreak table.
pub const MAX_REGIONS: usize = 4;

pub const ACTIVITY_ROW: u16 = 0;
pub const ACTIVITY_COL: u16 = 29;
pub const INPUT_COL: u16 = 1;
pub const INPUT_WIDTH: usize = 20;

const ICON_COL: u16 = 47;

/// Values above these are drawn in the attention style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cpu_temp_celsius: f64,
    pub memory_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_temp_celsius: 65.0,
            memory_percent: 80.0,
        }
    }
}

/// Everything one render reads. Nothing here is mutated by rendering.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub telemetry: &'a TelemetryState,
    pub settings: Settings,
    pub next: Option<NextUpdate>,
    pub regions: &'a [String],
    pub thresholds: Thresholds,
    pub version: &'a str,
}

/// How much of the screen to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderScope {
    /// Clear and write everything
    Full,
    /// The Often fields plus those of the listed tiers
    Partial(Vec<Tier>),
}

impl RenderScope {
    pub fn for_tiers(tiers: &[Tier]) -> Self {
        RenderScope::Partial(tiers.to_vec())
    }

    pub fn covers(&self, tier: Tier) -> bool {
        match self {
            RenderScope::Full => true,
            RenderScope::Partial(tiers) => tier == Tier::Often || tiers.contains(&tier),
        }
    }
}

/// Write `scope` of the dashboard for `view`.
pub fn render<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>, scope: &RenderScope) {
    if *scope == RenderScope::Full {
        renderer.clear_screen();
        draw_chrome(renderer, view.version);
    }
    if scope.covers(Tier::Often) {
        write_often(renderer, view);
    }
    if scope.covers(Tier::SemiOften) {
        write_semi_often(renderer, view);
    }
    if scope.covers(Tier::Daily) {
        write_daily(renderer, view);
    }
    if scope.covers(Tier::Static) {
        write_static(renderer, view);
    }
}

/// Style for a value: errors always draw attention.
fn value_style(value: Option<&FieldValue>) -> TextStyle {
    match value {
        Some(v) if v.is_error() => TextStyle::ATTENTION,
        _ => TextStyle::NORMAL,
    }
}

fn label<R: Renderer + ?Sized>(renderer: &mut R, row: u16, text: &str) -> u16 {
    renderer.write_field(row, 1, text, TextStyle::BOLD);
    1 + text.chars().count() as u16
}

/// `label` then the field's display value, padded to `width`.
fn labelled_field<R: Renderer + ?Sized>(
    renderer: &mut R,
    view: &DashboardView<'_>,
    row: u16,
    text: &str,
    field: Field,
    width: usize,
) {
    let col = label(renderer, row, text);
    let value = view.telemetry.get(field);
    renderer.write_field(
        row,
        col,
        &fit_width(&view.telemetry.display(field), width),
        value_style(value),
    );
}

fn write_often<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    let t = view.telemetry;

    // Clock, "HH :: MM"; the separator doubles as the activity marker
    let time = t.display(Field::Time);
    let (hour, minute) = time.split_once(':').unwrap_or((PLACEHOLDER, PLACEHOLDER));
    renderer.write_field(0, 26, &fit_width(hour, 2), TextStyle::BOLD);
    renderer.write_field(0, 28, " :: ", TextStyle::colored(Palette::Yellow));
    renderer.write_field(0, 32, &fit_width(minute, 2), TextStyle::BOLD);

    labelled_field(renderer, view, 9, "Processes: ", Field::Processes, 8);

    let col = label(renderer, 10, "CPU Temperature: ");
    let temp = t.get(Field::CpuTemp);
    let hot = temp
        .and_then(FieldValue::as_f64)
        .is_some_and(|c| c > view.thresholds.cpu_temp_celsius);
    let text = match temp {
        Some(FieldValue::Float(c)) => format!("{:.1}\u{00B0}C", c),
        _ => t.display(Field::CpuTemp),
    };
    let style = if hot { TextStyle::ATTENTION } else { value_style(temp) };
    renderer.write_field(10, col, &fit_width(&text, 12), style);

    write_memory(renderer, view);

    labelled_field(renderer, view, 16, "Uptime: ", Field::Uptime, 38);

    labelled_field(renderer, view, 24, "Connected to: ", Field::Essid, 32);
    labelled_field(renderer, view, 25, "Signal Strength: ", Field::SignalLevel, 28);
    let col = label(renderer, 26, "Signal Quality :  ");
    let quality = t.get(Field::SignalQuality);
    let text = match quality {
        Some(FieldValue::Int(q)) => format!("{}%", q),
        _ => t.display(Field::SignalQuality),
    };
    renderer.write_field(26, col, &fit_width(&text, 10), value_style(quality));

    let col = label(renderer, 38, "Refresh Interval: ");
    renderer.write_field(
        38,
        col,
        &fit_width(&format!("{} seconds", view.settings.tick_interval_secs), 20),
        TextStyle::NORMAL,
    );

    let col = label(renderer, 39, "Next update: ");
    let text = match view.next {
        Some(NextUpdate { tier: Tier::Daily, minutes }) => {
            format!("Big update in {} minute(s)", minutes)
        }
        Some(NextUpdate { minutes, .. }) => format!("Normal update in {} minute(s)", minutes),
        None => PLACEHOLDER.to_string(),
    };
    renderer.write_field(39, col, &fit_width(&text, 45), TextStyle::NORMAL);
}

fn write_memory<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    let t = view.telemetry;
    let col = label(renderer, 11, "Memory: ");
    let used = t.get(Field::MemUsed);
    let total = t.get(Field::MemTotal);

    let (Some(used_mib), Some(total_mib)) = (
        used.and_then(FieldValue::as_i64),
        total.and_then(FieldValue::as_i64),
    ) else {
        let text = if used.is_some_and(FieldValue::is_error) {
            t.display(Field::MemUsed)
        } else {
            t.display(Field::MemTotal)
        };
        let style = if used.is_some_and(FieldValue::is_error) || total.is_some_and(FieldValue::is_error) {
            TextStyle::ATTENTION
        } else {
            TextStyle::NORMAL
        };
        renderer.write_field(11, col, &fit_width(&text, 36), style);
        return;
    };

    let share = percent(used_mib, total_mib);
    let high = share.is_some_and(|p| p > view.thresholds.memory_percent);
    let used_text = format!("{}MiB", used_mib);
    let rest = match share {
        Some(p) => format!(" / {}MiB ({:.1}%)", total_mib, p),
        None => format!(" / {}MiB", total_mib),
    };
    let used_style = if high { TextStyle::ATTENTION } else { TextStyle::NORMAL };
    renderer.write_field(11, col, &used_text, used_style);
    let rest_col = col + used_text.chars().count() as u16;
    renderer.write_field(
        11,
        rest_col,
        &fit_width(&rest, 36usize.saturating_sub(used_text.len())),
        TextStyle::NORMAL,
    );
}

fn write_semi_often<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    let t = view.telemetry;

    let col = label(renderer, 20, "Internet Access: ");
    let access = t.get(Field::InternetAccess);
    let online = access.and_then(FieldValue::as_text) == Some(ESTABLISHED);
    let style = match access {
        None => TextStyle::NORMAL,
        Some(_) if online => TextStyle::colored(Palette::Green),
        Some(_) => TextStyle::ATTENTION,
    };
    renderer.write_field(20, col, &fit_width(&t.display(Field::InternetAccess), 28), style);

    let col = label(renderer, 21, "Approx. speed: ");
    let (text, style) = speed_text(t, access.is_some() && !online);
    renderer.write_field(21, col, &fit_width(&text, 30), style);

    labelled_field(renderer, view, 22, "LAN IP : ", Field::LanIp, 28);
    labelled_field(renderer, view, 23, "WLAN IP: ", Field::WlanIp, 28);

    write_outbreak_table(renderer, view);
}

fn speed_text(t: &TelemetryState, offline: bool) -> (String, TextStyle) {
    let down = t.get(Field::SpeedDown);
    let up = t.get(Field::SpeedUp);
    if offline || down.and_then(FieldValue::as_text) == Some(NO_INTERNET) {
        return (NO_INTERNET.to_string(), TextStyle::ATTENTION);
    }
    match (down, up) {
        (Some(FieldValue::Error(FieldError::Disabled)), _) => {
            ("DISABLED".to_string(), TextStyle::colored(Palette::Red))
        }
        (Some(FieldValue::Text(d)), Some(FieldValue::Text(u))) => {
            (format!("\u{2193}{} | \u{2191}{}", d, u), TextStyle::NORMAL)
        }
        (Some(v), _) | (None, Some(v)) if v.is_error() => (v.to_string(), TextStyle::ATTENTION),
        _ => (PLACEHOLDER.to_string(), TextStyle::NORMAL),
    }
}

fn write_outbreak_table<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    let t = view.telemetry;
    renderer.write_field(30, 1, "COUNTRY     | INFECTIONS | DEATHS |", TextStyle::BOLD);
    renderer.write_field(31, 1, "------------|------------|--------|", TextStyle::BOLD);

    let mut rows = vec![("Worldwide", Field::WorldInfected, Field::WorldDead)];
    rows.extend(
        view.regions
            .iter()
            .take(MAX_REGIONS)
            .enumerate()
            .map(|(i, name)| (name.as_str(), Field::RegionInfected(i), Field::RegionDead(i))),
    );

    for (offset, (name, infected, dead)) in rows.into_iter().enumerate() {
        let row = 32 + offset as u16;
        renderer.write_field(
            row,
            1,
            &format!("{} |            |        |", fit_width(name, 11)),
            TextStyle::BOLD,
        );
        renderer.write_field(
            row,
            14,
            &right_align(&t.display(infected), 11),
            value_style(t.get(infected)),
        );
        renderer.write_field(
            row,
            27,
            &right_align(&t.display(dead), 7),
            value_style(t.get(dead)),
        );
    }
}

fn write_daily<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    let col = label(renderer, 37, "Updates: ");
    let value = view.telemetry.get(Field::UpdateCount);
    let style = match value {
        Some(FieldValue::Int(0)) => TextStyle::new(Attr::Dim, Palette::Default),
        Some(FieldValue::Int(_)) => TextStyle::BOLD,
        other => value_style(other),
    };
    renderer.write_field(
        37,
        col,
        &fit_width(&view.telemetry.display(Field::UpdateCount), 12),
        style,
    );
}

fn write_static<R: Renderer + ?Sized>(renderer: &mut R, view: &DashboardView<'_>) {
    labelled_field(renderer, view, 6, "Hostname: ", Field::Hostname, 35);
    labelled_field(renderer, view, 7, "Kernel: ", Field::Kernel, 37);
    labelled_field(renderer, view, 13, "Eth MAC : ", Field::LanMac, 35);
    labelled_field(renderer, view, 14, "Wifi MAC: ", Field::WifiMac, 35);
}

/// Title, section borders and icons.
pub fn draw_chrome<R: Renderer + ?Sized>(renderer: &mut R, version: &str) {
    let banner = TextStyle::new(Attr::Bold, Palette::Cyan);
    renderer.write_field(1, 0, &format!("{} || {}", " >".repeat(14), "< ".repeat(14)), banner);
    renderer.write_field(2, 1, &format!("{}{}{}", " >".repeat(5), " ".repeat(38), "< ".repeat(5)), banner);
    let title = "Statmon - Activity Monitor V";
    renderer.write_field(2, 12, title, TextStyle::colored(Palette::Magenta));
    renderer.write_field(
        2,
        12 + title.len() as u16,
        version,
        TextStyle::new(Attr::Bold, Palette::Magenta),
    );
    renderer.write_field(3, 31, "OUTBREAK SPECIAL EDITION", TextStyle::colored(Palette::Red));

    for (row, title, fill) in [
        (4, "SYSTEM INFORMATION", 25),
        (18, "NETWORK STATUS", 21),
        (28, "OUTBREAK STATISTICS", 26),
    ] {
        let rule = format!("-=-=-{}{}-", " ".repeat(fill - 5), "-=".repeat((58 - fill) / 2));
        renderer.write_field(row, 1, &rule, TextStyle::NORMAL);
        renderer.write_field(row, 7, title, TextStyle::BOLD);
    }

    let chip = TextStyle::colored(Palette::Cyan);
    for (i, line) in [
        " *  *#*  * ",
        "*** *#* ***",
        " *#######* ",
        "  ##   ##  ",
        "**# +++ #**",
        "### + + ###",
        "**# +++ #**",
        "  ##   ##  ",
        " *#######* ",
        "*** *#* ***",
        " *  *#*  * ",
    ]
    .iter()
    .enumerate()
    {
        renderer.write_field(6 + i as u16, ICON_COL, line, chip);
    }
    let core = TextStyle::new(Attr::Inverse, Palette::Cyan);
    renderer.write_field(10, 51, "+++", core);
    renderer.write_field(11, 51, "+", core);
    renderer.write_field(11, 53, "+", core);
    renderer.write_field(12, 51, "+++", core);

    let mast = TextStyle::new(Attr::Bold, Palette::Blue);
    for (i, line) in [
        "//      \\\\",
        "|| /><\\ ||",
        "|| \\></ ||",
        "\\\\  ||  //",
        "    ||",
        "    ||",
        "   /||\\",
    ]
    .iter()
    .enumerate()
    {
        renderer.write_field(20 + i as u16, 48, line, mast);
    }
    renderer.write_field(21, 51, "/><\\", TextStyle::colored(Palette::Red));
    renderer.write_field(22, 51, "\\></", TextStyle::colored(Palette::Red));

    let germ = TextStyle::new(Attr::Bold, Palette::Green);
    for (i, line) in [
        "    #",
        " #  |  #",
        "  \\>|</",
        "  v/ \\v",
        "#--|+|--#",
        "  v\\_/v",
        "  />|<\\",
        " #  |  #",
        "    #",
    ]
    .iter()
    .enumerate()
    {
        renderer.write_field(30 + i as u16, 49, line, germ);
    }
    for (row, col) in [(30, 53), (31, 50), (31, 56), (34, 49), (34, 57), (37, 50), (37, 56), (38, 53)] {
        renderer.write_field(row, col, "#", TextStyle::colored(Palette::Red));
    }
    renderer.write_field(34, 53, "+", TextStyle::new(Attr::Inverse, Palette::Green));
}

/// Highlight or release the `::` marker shown while a tick works.
pub fn set_activity<R: Renderer + ?Sized>(renderer: &mut R, busy: bool) {
    let style = if busy {
        TextStyle::new(Attr::Inverse, Palette::Yellow)
    } else {
        TextStyle::colored(Palette::Yellow)
    };
    renderer.write_field(ACTIVITY_ROW, ACTIVITY_COL, "::", style);
}

/// Echo the key handled this tick, or blank the slot.
pub fn echo_input<R: Renderer + ?Sized>(renderer: &mut R, key: Option<&str>) {
    let text = key.map(|k| format!("Input: {}", k)).unwrap_or_default();
    renderer.write_field(0, INPUT_COL, &fit_width(&text, INPUT_WIDTH), TextStyle::NORMAL);
}
