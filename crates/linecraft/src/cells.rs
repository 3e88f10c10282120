//! Display-cell width measurement and escape-aware truncation.
//!
//! Every code point has a cell count of 0 (combining/zero-width/control, and
//! every byte inside a recognized escape sequence), 1 (normal), or 2
//! (East-Asian Wide/Full-width). All width accounting and truncation in this
//! crate is expressed in cells, never code units.

use unicode_width::UnicodeWidthChar;

use crate::escape::EscapeIndex;

/// Width in display cells of a single character, ignoring escape-sequence
/// context (a caller walking raw escape bytes should not call this on them —
/// see [`width_str`] for the escape-aware string-level accounting).
pub fn width_char(ch: char) -> usize {
    match ch {
        // Control characters and zero-width/combining marks occupy no cell.
        c if c.is_control() => 0,
        c => UnicodeWidthChar::width(c).unwrap_or(0),
    }
}

/// Total display-cell width of `s`: the sum of [`width_char`] over its
/// visible code points, with every byte inside a recognized escape sequence
/// contributing 0 cells.
pub fn width_str(s: &str) -> usize {
    let index = EscapeIndex::scan(s);
    let mut total = 0;
    for (offset, ch) in s.char_indices() {
        if index.contains_offset(offset) {
            continue;
        }
        total += width_char(ch);
    }
    total
}

/// The largest prefix of `s[start_offset..]` whose cell-width is `<=
/// max_cells`, returned as a code-unit count from `start_offset`. Escape
/// sequences traversed within that prefix contribute 0 cells but are
/// included in the returned count, so the caller can slice
/// `&s[start_offset..start_offset+n]` and get a complete, escape-sequence
/// safe substring.
///
/// If the next visible character is wide (2 cells) and `max_cells` is 1, this
/// returns 0; the caller is expected to substitute a single-cell placeholder
/// (canonically `?`).
pub fn truncate_tail(s: &str, start_offset: usize, max_cells: usize) -> usize {
    if max_cells == 0 {
        return 0;
    }
    let index = EscapeIndex::scan(s);
    let mut used = 0usize;
    let mut n = 0usize;
    let mut i = start_offset;
    let bytes = s.as_bytes();
    while i < bytes.len() {
        if let Some(sp) = index.span_at(i) {
            n += sp.len;
            i += sp.len;
            continue;
        }
        let ch = match s[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        let w = width_char(ch);
        if used + w > max_cells {
            break;
        }
        used += w;
        let step = ch.len_utf8();
        n += step;
        i += step;
    }
    n
}

/// `truncate_tail(s, 0, max_cells)`.
pub fn head_split(s: &str, max_cells: usize) -> usize {
    truncate_tail(s, 0, max_cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one_cell_each() {
        assert_eq!(width_str("hello"), 5);
    }

    #[test]
    fn wide_chars_count_two() {
        assert_eq!(width_str("日本語"), 6);
    }

    #[test]
    fn escape_sequences_count_zero() {
        assert_eq!(width_str("\x1b[31mred\x1b[0m"), 3);
    }

    #[test]
    fn width_matches_plain_text_width() {
        let s = "\x1b[1mhello\x1b[0m world";
        assert_eq!(width_str(s), width_str(&EscapeIndex::plain_text(s)));
    }

    #[test]
    fn truncate_tail_stops_before_overflow() {
        let n = truncate_tail("hello world", 0, 5);
        assert_eq!(&"hello world"[..n], "hello");
    }

    #[test]
    fn truncate_tail_includes_escape_bytes_in_count() {
        let s = "\x1b[31mhi\x1b[0m";
        let n = truncate_tail(s, 0, 2);
        assert_eq!(&s[..n], s); // both visible chars fit, escapes tag along
    }

    #[test]
    fn truncate_tail_returns_zero_for_wide_char_over_budget() {
        let n = truncate_tail("日本語", 0, 1);
        assert_eq!(n, 0);
    }

    #[test]
    fn head_split_is_truncate_tail_from_zero() {
        assert_eq!(head_split("hello", 3), truncate_tail("hello", 0, 3));
    }
}
