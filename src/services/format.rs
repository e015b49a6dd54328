//! Display formatting shared by the CLI tables and the TUI

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a number with thousands separators: 1234567 → "1,234,567"
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Matrix cell: "-" for zero, otherwise `format_number`
pub fn format_cell(n: u64) -> String {
    if n == 0 {
        "-".to_string()
    } else {
        format_number(n)
    }
}

/// Terminal column width (full-width characters count as 2)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `width` columns, ending with "…" when cut
pub fn truncate(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align within `width` columns (truncating if needed)
pub fn pad_right(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let pad = width.saturating_sub(display_width(&s));
    format!("{}{}", s, " ".repeat(pad))
}

/// Right-align within `width` columns (truncating if needed)
pub fn pad_left(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let pad = width.saturating_sub(display_width(&s));
    format!("{}{}", " ".repeat(pad), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_cell_zero_is_dash() {
        assert_eq!(format_cell(0), "-");
        assert_eq!(format_cell(12000), "12,000");
    }

    #[test]
    fn test_display_width_full_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("あんこ餅"), 8);
    }

    #[test]
    fn test_truncate_respects_wide_chars() {
        assert_eq!(truncate("あんこ餅", 8), "あんこ餅");
        assert_eq!(truncate("あんこ餅", 6), "あん…");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_right("あ", 4), "あ  ");
        assert_eq!(pad_left("12", 5), "   12");
        assert_eq!(display_width(&pad_right("あんこ餅", 5)), 5);
    }
}
