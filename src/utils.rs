pub mod markdown;

pub use markdown::render_markdown;

use unicode_width::UnicodeWidthChar;

pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Scores arrive as floats; whole numbers print without a fraction.
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        let fixed = format!("{:.2}", score);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Breaks `text` into display lines no wider than `max_width` columns,
/// splitting on explicit newlines and between characters. Returns byte ranges
/// into `text`; the newline itself belongs to no range.
pub fn wrap_by_width(text: &str, max_width: usize) -> Vec<(usize, usize)> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut width = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((start, idx));
            start = idx + 1;
            width = 0;
            continue;
        }
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width && width > 0 {
            lines.push((start, idx));
            start = idx;
            width = 0;
        }
        width += ch_width;
    }
    lines.push((start, text.len()));
    lines
}

/// Row and column of a byte cursor within the lines produced by
/// [`wrap_by_width`]. A cursor after a full line moves to the next row.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    let cursor = cursor_index.min(text.len());
    let lines = wrap_by_width(text, max_width);
    let (row, start) = lines
        .iter()
        .enumerate()
        .rev()
        .find(|(_, (start, _))| *start <= cursor)
        .map(|(row, (start, _))| (row, *start))
        .unwrap_or((0, 0));

    let col: usize = text[start..cursor]
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum();
    if col >= max_width.max(1) {
        (row + 1, 0)
    } else {
        (row, col)
    }
}
