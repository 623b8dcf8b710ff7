use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `s` to at most `max_width` display columns, ending in "...".
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Simulate how text wraps with trimming (matching ratatui Wrap { trim: true } behavior).
/// Returns (line_text, start_char, end_char) for each visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start = 0;
    let mut char_count = 0;

    for (char_idx, ch) in text.chars().enumerate() {
        char_count = char_idx + 1;
        if ch == '\n' {
            lines.push((current_line.trim_end().to_string(), line_start, char_idx));
            current_line = String::new();
            current_width = 0;
            line_start = char_idx + 1;
        } else {
            let char_width = ch.width().unwrap_or(1);

            if current_width + char_width > max_width && current_width > 0 {
                lines.push((current_line.trim_end().to_string(), line_start, char_idx));
                current_line = ch.to_string();
                current_width = char_width;
                line_start = char_idx;
            } else {
                current_line.push(ch);
                current_width += char_width;
            }
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        lines.push((current_line.trim_end().to_string(), line_start, char_count));
    }

    lines
}

/// Line and column of a cursor (in characters) within wrapped text.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped_lines = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start, end)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            return (line_idx, cursor_index.saturating_sub(*start));
        }
    }

    if let Some((last_text, _, last_end)) = wrapped_lines.last()
        && cursor_index >= *last_end
    {
        return (wrapped_lines.len() - 1, last_text.chars().count());
    }

    (0, 0)
}
