use humansize::{format_size, BINARY};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Pad `text` with spaces, or cut it, to exactly `width` columns.
///
/// Every value slot on the dashboard is written through this so a shorter
/// value fully covers a longer previous one.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Right-align `text` in `width` columns, as used by table cells.
pub fn right_align(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        fit_width(text, width)
    } else {
        format!("{}{}", " ".repeat(width - w), text)
    }
}

/// Human-readable size of `mib` mebibytes ("1.5 GiB").
pub fn format_mib(mib: i64) -> String {
    format_size(mib.max(0) as u64 * 1024 * 1024, BINARY)
}

/// Share of `used` in `total` as a percentage, one decimal.
pub fn percent(used: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }
    Some((used as f64 * 1000.0 / total as f64).round() / 10.0)
}
