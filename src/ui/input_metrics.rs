use unicode_width::UnicodeWidthChar;

/// Splits `input` into display rows no wider than `width`, breaking on
/// newlines and hard-wrapping long lines by display width.
pub fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![String::new()];
    let mut current_width = 0usize;
    for ch in input.chars() {
        if ch == '\r' {
            continue;
        }
        if ch == '\n' {
            lines.push(String::new());
            current_width = 0;
            continue;
        }
        let ch_width = char_display_width(ch);
        if current_width + ch_width > width && current_width > 0 {
            lines.push(String::new());
            current_width = 0;
        }
        if let Some(line) = lines.last_mut() {
            line.push(ch);
        }
        current_width += ch_width;
    }
    lines
}

pub fn cursor_row_col(input: &str, cursor_byte: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut row = 0usize;
    let mut col = 0usize;
    let cursor_byte = clamp_to_char_boundary_left(input, cursor_byte);

    for (idx, ch) in input.char_indices() {
        if idx >= cursor_byte {
            break;
        }
        if ch == '\r' {
            continue;
        }
        if ch == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        let ch_width = char_display_width(ch);
        if col + ch_width > width && col > 0 {
            row += 1;
            col = 0;
        }
        col += ch_width;
    }

    if col >= width {
        row += 1;
        col = 0;
    }

    (row, col)
}

pub fn truncate_to_display_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > max_width && used > 0 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_breaks_on_newlines_and_width() {
        assert_eq!(wrap_input_lines("abcdef\ngh", 4), vec!["abcd", "ef", "gh"]);
        assert_eq!(wrap_input_lines("", 4), vec![""]);
        assert_eq!(wrap_input_lines("a\r\nb", 4), vec!["a", "b"]);
    }

    #[test]
    fn test_wrap_counts_wide_chars_by_display_width() {
        assert_eq!(wrap_input_lines("字字字", 4), vec!["字字", "字"]);
    }

    #[test]
    fn test_cursor_follows_wraps() {
        assert_eq!(cursor_row_col("abcdef", 6, 4), (1, 2));
        assert_eq!(cursor_row_col("ab\ncd", 4, 10), (1, 1));
        assert_eq!(cursor_row_col("abcd", 4, 4), (1, 0));
    }

    #[test]
    fn test_truncate_keeps_at_least_one_char() {
        assert_eq!(truncate_to_display_width("hello", 3), "hel");
        assert_eq!(truncate_to_display_width("字", 1), "字");
    }
}
