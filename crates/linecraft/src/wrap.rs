//! Line splitting, word splitting, and width-aware wrapping, preserving SGR
//! escape state across every boundary it introduces.

use crate::cells::width_char;
use crate::cells::width_str;
use crate::escape::{EscapeIndex, RESET};

/// Hard-coded set of locales that use whitespace-delimited word-wrap. Every
/// other locale falls back to character-wrap. Preserved verbatim from the
/// source policy (see DESIGN.md); exposed as a constant rather than inline
/// match arms so a caller can extend or override the set without touching
/// this module.
pub const WORD_WRAP_LOCALES: &[&str] = &["en", "fr", "de", "it", "pt", "es"];

pub fn uses_word_wrap(locale: &str) -> bool {
    WORD_WRAP_LOCALES.contains(&locale)
}

fn is_sgr(seq: &str) -> bool {
    seq.starts_with("\x1b[") && seq.ends_with('m') && !seq.starts_with("\x1b[?")
}

fn apply_sgr_to_open(open: &mut Vec<String>, seq: &str) {
    if !is_sgr(seq) {
        return;
    }
    if seq == RESET {
        open.clear();
    } else {
        open.push(seq.to_string());
    }
}

/// Splits `s` on `\n`, dropping any preceding `\r`. Every emitted line is
/// self-contained with respect to SGR state at a split boundary: a line
/// followed by another split line gets `RESET` appended if it left SGR state
/// open, and the next line is prefixed with the accumulated open codes. The
/// true last line is left exactly as scanned (see S7) — there is no further
/// boundary after it to close against.
pub fn split_lines(s: &str) -> Vec<String> {
    let raw: Vec<&str> = s.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let mut open: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(raw.len());
    let last_index = raw.len().saturating_sub(1);

    for (i, raw_line) in raw.iter().enumerate() {
        let mut line = String::new();
        if i > 0 && !open.is_empty() {
            line.push_str(&open.concat());
        }
        line.push_str(raw_line);

        let index = EscapeIndex::scan(raw_line);
        for sp in index.spans() {
            apply_sgr_to_open(&mut open, &raw_line[sp.offset..sp.offset + sp.len]);
        }

        if i != last_index && !open.is_empty() && !line.ends_with(RESET) {
            line.push_str(RESET);
        }

        if EscapeIndex::plain_text(&line).is_empty() {
            out.push(String::new());
        } else {
            out.push(line);
        }
    }
    out
}

/// One token produced by [`get_words`].
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    /// The delimiter that followed this word: `" "`, `"\t"`, the soft hyphen
    /// `U+00AD`, or empty at end of input. Non-breaking space/hyphen never
    /// produce a delimiter — they stay embedded in the surrounding word as
    /// ordinary visible content, since a boundary there must never be a
    /// wrap opportunity.
    pub delimiter: String,
    /// True if [`get_words`] had to force-append `RESET` because this word
    /// left SGR state open at its end without already closing it.
    pub vt_reset_appended: bool,
}

/// Splits `s` into `(word, delimiter, vt_reset_appended)` triples. Escape
/// sequences inside a word travel with it; a `RESET` seen inside a word
/// empties the tracked-open-SGR buffer. A word that still has open SGR state
/// at its end (and does not already end with `RESET`) gets one appended, and
/// `vt_reset_appended` is set so a caller splicing in a suffix (a literal
/// soft-hyphen dash, a word-wrap continuation marker) knows to insert it
/// before that trailing `RESET` rather than after.
pub fn get_words(s: &str) -> Vec<Word> {
    let index = EscapeIndex::scan(s);
    let mut words = Vec::new();
    let mut buf = String::new();
    let mut open: Vec<String> = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(sp) = index.span_at(i) {
            let seq = &s[sp.offset..sp.offset + sp.len];
            buf.push_str(seq);
            apply_sgr_to_open(&mut open, seq);
            i += sp.len;
            continue;
        }
        let ch = s[i..].chars().next().expect("valid utf8 boundary");
        match ch {
            ' ' | '\t' | '\u{00AD}' => {
                words.push(flush_word(&mut buf, &mut open, ch.to_string()));
            }
            _ => buf.push(ch),
        }
        i += ch.len_utf8();
    }
    if !buf.is_empty() {
        words.push(flush_word(&mut buf, &mut open, String::new()));
    }
    words
}

fn flush_word(buf: &mut String, open: &mut Vec<String>, delimiter: String) -> Word {
    let mut text = std::mem::take(buf);
    let mut vt_reset_appended = false;
    if !open.is_empty() && !text.ends_with(RESET) {
        text.push_str(RESET);
        vt_reset_appended = true;
    }
    Word {
        text,
        delimiter,
        vt_reset_appended,
    }
}

/// Character-by-character chunking of `text` into segments whose cell-width
/// never exceeds `first_width` (first segment) or `follow_width` (every
/// segment after), carrying SGR state across each break via `open` (which
/// the caller owns across calls so state continues into subsequent words).
/// Guarantees progress: if the budget is 1 cell and the next visible
/// character is 2-wide, emits a single `?` placeholder rather than looping
/// forever.
fn char_wrap_run(text: &str, first_width: usize, follow_width: usize, open: &mut Vec<String>) -> Vec<String> {
    let index = EscapeIndex::scan(text);
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    let mut width_limit = first_width.max(1);
    if !open.is_empty() {
        current.push_str(&open.concat());
    }
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(sp) = index.span_at(i) {
            let seq = &text[sp.offset..sp.offset + sp.len];
            current.push_str(seq);
            apply_sgr_to_open(open, seq);
            i += sp.len;
            continue;
        }
        let ch = text[i..].chars().next().expect("valid utf8 boundary");
        let w = width_char(ch);

        if current_width == 0 && w > width_limit {
            current.push('?');
            current_width = width_limit;
            i += ch.len_utf8();
            continue;
        }
        if current_width + w > width_limit {
            if !open.is_empty() && !current.ends_with(RESET) {
                current.push_str(RESET);
            }
            segments.push(std::mem::take(&mut current));
            current_width = 0;
            width_limit = follow_width.max(1);
            if !open.is_empty() {
                current.push_str(&open.concat());
            }
            continue;
        }
        current.push(ch);
        current_width += w;
        i += ch.len_utf8();
    }
    if !open.is_empty() && !current.ends_with(RESET) {
        current.push_str(RESET);
    }
    segments.push(current);
    segments
}

fn finish_line(current: &mut String, open: &[String]) -> String {
    let mut line = std::mem::take(current);
    if !open.is_empty() && !line.ends_with(RESET) {
        line.push_str(RESET);
    }
    line
}

fn word_wrap(s: &str, first_len: usize, follow_len: usize) -> Vec<String> {
    let words = get_words(s);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    let mut open: Vec<String> = Vec::new();
    let mut line_index = 0usize;
    let mut prev_delim: Option<char> = None;

    for word in &words {
        if word.text.is_empty() {
            prev_delim = word.delimiter.chars().next().or(prev_delim);
            continue;
        }
        let word_width = width_str(&EscapeIndex::plain_text(&word.text));
        let line_limit = if line_index == 0 { first_len } else { follow_len };

        if word_width > line_limit {
            if current_width > 0 {
                lines.push(finish_line(&mut current, &open));
                line_index += 1;
                current_width = 0;
            }
            let seg_first = if line_index == 0 { first_len } else { follow_len };
            let mut segs = char_wrap_run(&word.text, seg_first, follow_len, &mut open);
            let tail = segs.pop().unwrap_or_default();
            for seg in segs {
                lines.push(seg);
                line_index += 1;
            }
            current = tail;
            current_width = width_str(&EscapeIndex::plain_text(&current));
            prev_delim = word.delimiter.chars().next();
            continue;
        }

        let mut force_break = false;
        let (joiner, joiner_width) = match prev_delim {
            None => (String::new(), 0),
            Some('\u{00AD}') => {
                let remaining = line_limit.saturating_sub(current_width);
                if remaining == word_width + 1 {
                    ("-".to_string(), 1)
                } else {
                    // §9: when the word alone fits exactly but the trailing
                    // hyphen would overflow by one cell, the hyphen is not
                    // rendered but the line breaks there anyway.
                    if remaining == word_width && current_width > 0 {
                        force_break = true;
                    }
                    (String::new(), 0)
                }
            }
            Some(_) => (" ".to_string(), 1),
        };

        let tentative = current_width + joiner_width + word_width;
        if current_width > 0 && (tentative > line_limit || force_break) {
            lines.push(finish_line(&mut current, &open));
            line_index += 1;
            current_width = 0;
            if !open.is_empty() {
                current.push_str(&open.concat());
            }
            current.push_str(&word.text);
            current_width = word_width;
        } else {
            if current_width == 0 && !open.is_empty() {
                current.push_str(&open.concat());
            }
            if !joiner.is_empty() {
                if current.ends_with(RESET) {
                    let insert_at = current.len() - RESET.len();
                    current.insert_str(insert_at, &joiner);
                } else {
                    current.push_str(&joiner);
                }
            }
            current.push_str(&word.text);
            current_width += joiner_width + word_width;
        }

        for sp in EscapeIndex::scan(&word.text).spans() {
            apply_sgr_to_open(&mut open, &word.text[sp.offset..sp.offset + sp.len]);
        }
        prev_delim = word.delimiter.chars().next();
    }

    if current_width > 0 || !current.is_empty() {
        lines.push(finish_line(&mut current, &open));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wraps `s` to fit `first_len` cells on the first emitted line and
/// `follow_len` on every line after. If either is `<= 0` the output is
/// empty. `locale` selects word-wrap ([`WORD_WRAP_LOCALES`]) or
/// character-wrap (everything else, including CJK).
pub fn generate_lines(s: &str, first_len: i32, follow_len: i32, locale: &str) -> Vec<String> {
    if first_len <= 0 || follow_len <= 0 {
        return Vec::new();
    }
    let first_len = first_len as usize;
    let follow_len = follow_len as usize;
    if uses_word_wrap(locale) {
        word_wrap(s, first_len, follow_len)
    } else {
        let mut open = Vec::new();
        char_wrap_run(s, first_len, follow_len, &mut open)
    }
}

/// Returns the prefix of `s` before the first `\n` or `\r`, appended with an
/// ellipsis glyph.
pub fn truncate_at_newline(s: &str) -> String {
    let end = s
        .find(['\n', '\r'])
        .unwrap_or(s.len());
    format!("{}…", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    // S1
    #[test]
    fn word_wrap_latin_locale() {
        let lines = generate_lines("hello world foo bar", 10, 10, "en");
        assert_eq!(lines, vec!["hello", "world foo", "bar"]);
        for line in &lines {
            assert!(width_str(line) <= 10);
        }
    }

    // S2
    #[test]
    fn character_wrap_cjk_locale() {
        let lines = generate_lines("日本語テスト", 4, 4, "ja");
        assert_eq!(lines, vec!["日本", "語テ", "スト"]);
        for line in &lines {
            assert_eq!(width_str(line), 4);
        }
    }

    // S3
    #[test]
    fn color_state_preserved_across_character_wrap() {
        let lines = generate_lines("ab\x1b[31mcdefgh\x1b[0mij", 4, 4, "ja");
        for line in &lines {
            assert!(width_str(line) <= 4);
            // P3: zero open codes, or ends with RESET.
            let opens = EscapeIndex::scan(line)
                .spans()
                .iter()
                .filter(|sp| {
                    let seq = &line[sp.offset..sp.offset + sp.len];
                    is_sgr(seq) && seq != RESET
                })
                .count();
            let closes = EscapeIndex::scan(line)
                .spans()
                .iter()
                .filter(|sp| &line[sp.offset..sp.offset + sp.len] == RESET)
                .count();
            assert!(opens == closes || line.ends_with(RESET));
        }
        assert!(lines[0].contains("\x1b[31m"));
    }

    // S7
    #[test]
    fn split_lines_carries_sgr_across_newline_boundary() {
        let lines = split_lines("x\x1b[31my\nz");
        assert_eq!(lines, vec!["x\x1b[31my\x1b[0m".to_string(), "\x1b[31mz".to_string()]);
    }

    // P4
    #[test]
    fn split_lines_round_trips_plain_text() {
        let s = "alpha\nbeta\r\ngamma";
        let joined = split_lines(s).join("\n");
        assert_eq!(joined, s.replace('\r', ""));
    }

    #[test]
    fn split_lines_drops_escape_only_lines() {
        let lines = split_lines("a\n\x1b[31m\x1b[0m\nb");
        assert_eq!(lines[1], "");
    }

    // §9: soft hyphen whose word fits exactly but whose hyphen would
    // overflow by one cell renders no hyphen but still breaks there.
    #[test]
    fn soft_hyphen_forces_break_when_hyphen_would_overflow_by_one() {
        let lines = generate_lines("hello\u{00AD}world", 10, 10, "en");
        assert_eq!(lines, vec!["hello", "world"]);
    }

    #[test]
    fn get_words_classifies_delimiters() {
        let words = get_words("a b\tc\u{00AD}d");
        assert_eq!(words[0].text, "a");
        assert_eq!(words[0].delimiter, " ");
        assert_eq!(words[1].text, "b");
        assert_eq!(words[1].delimiter, "\t");
        assert_eq!(words[2].text, "c");
        assert_eq!(words[2].delimiter, "\u{00AD}");
    }

    #[test]
    fn get_words_appends_reset_when_sgr_left_open() {
        let words = get_words("\x1b[31mred stuff");
        assert!(words[0].vt_reset_appended);
        assert!(words[0].text.ends_with(RESET));
    }

    #[test]
    fn non_breaking_chars_never_split_a_word() {
        let words = get_words("no\u{00A0}break here");
        assert_eq!(words[0].text, "no\u{00A0}break");
        assert_eq!(words[1].text, "here");
    }

    #[test]
    fn zero_or_negative_widths_yield_empty_output() {
        assert!(generate_lines("hello", 0, 10, "en").is_empty());
        assert!(generate_lines("hello", 10, -1, "en").is_empty());
    }

    #[test]
    fn truncate_at_newline_keeps_prefix_and_appends_ellipsis() {
        assert_eq!(truncate_at_newline("abc\ndef"), "abc…");
        assert_eq!(truncate_at_newline("abc\rdef"), "abc…");
        assert_eq!(truncate_at_newline("no newline"), "no newline…");
    }

    // P2
    #[test]
    fn every_wrapped_line_respects_its_width_budget() {
        let samples = [
            "the quick brown fox jumps over the lazy dog",
            "supercalifragilisticexpialidocious word",
            "日本語のテキストを折り返すテスト",
        ];
        for s in samples {
            for locale in ["en", "ja"] {
                let lines = generate_lines(s, 8, 6, locale);
                for (i, line) in lines.iter().enumerate() {
                    let budget = if i == 0 { 8 } else { 6 };
                    assert!(
                        width_str(line) <= budget,
                        "line {:?} exceeds budget {budget} for locale {locale}",
                        line
                    );
                }
            }
        }
    }
}
