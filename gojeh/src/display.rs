//! Status line rendering: `<glyph> <sign>MM:SS`.

/// Format a second count as `MM:SS`, with a leading `-` once the timer has
/// overrun. Minutes are not wrapped into hours.
pub fn format_remaining(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
}

pub fn status_line(label: &str, seconds: i64) -> String {
    format!("{label} {}", format_remaining(seconds))
}
