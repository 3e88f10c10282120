//! Label/value list rendering: a fixed label column followed by a wrapped
//! value, with continuation lines aligned under the value column.

use crate::cells::{truncate_tail, width_str};
use crate::escape::{EscapeIndex, RESET};
use crate::external::LineSink;
use crate::style::StyleConfig;
use crate::wrap::{generate_lines, split_lines};

/// One label/value pair to be rendered as a list entry.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub label: String,
    pub value: String,
}

impl ListEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Renders a run of entries sharing one label column, aligning every value
/// to the same starting cell and indenting wrapped continuation lines to
/// match.
pub struct ListWriter {
    columns: i32,
    locale: String,
    separator: String,
    min_field_width: i32,
    accent: Option<String>,
    strip_ansi: bool,
}

impl ListWriter {
    pub fn new(columns: i32, locale: impl Into<String>) -> Self {
        Self {
            columns,
            locale: locale.into(),
            separator: " : ".to_string(),
            min_field_width: 10,
            accent: None,
            strip_ansi: false,
        }
    }

    /// Applies a [`StyleConfig`] snapshot: under `PlainText`/`Host` rendering,
    /// every line this writer emits has its escape sequences stripped before
    /// reaching the sink (§6), including any accent this writer itself adds.
    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.strip_ansi = style.plain_text_only();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_min_field_width(mut self, width: i32) -> Self {
        self.min_field_width = width;
        self
    }

    /// Wraps accented label text in the given SGR sequence, closed with a
    /// reset. Only applied to non-blank labels.
    pub fn with_accent(mut self, sgr: impl Into<String>) -> Self {
        self.accent = Some(sgr.into());
        self
    }

    /// Renders `entries` to `sink`. The label column width is the longest
    /// plain-text label among `entries`, clipped so the label plus
    /// separator never crowds the value field below `min_field_width`
    /// cells.
    pub fn render(&self, entries: &[ListEntry], sink: &mut dyn LineSink) {
        if entries.is_empty() {
            return;
        }

        let sep_width = width_str(&self.separator) as i32;
        let max_label_width = entries
            .iter()
            .map(|e| width_str(&e.label) as i32)
            .max()
            .unwrap_or(0);

        let label_budget = (self.columns - sep_width - self.min_field_width).max(0);
        let label_width = max_label_width.min(label_budget);

        let value_column = label_width + sep_width;
        let value_width = (self.columns - value_column).max(1);

        for entry in entries {
            self.render_entry(entry, label_width, value_column, value_width, sink);
        }
    }

    fn render_entry(
        &self,
        entry: &ListEntry,
        label_width: i32,
        value_column: i32,
        value_width: i32,
        sink: &mut dyn LineSink,
    ) {
        let label_cell = self.format_label(&entry.label, label_width);

        let raw_lines = split_lines(&entry.value);
        let mut wrapped: Vec<String> = Vec::new();
        for raw in &raw_lines {
            let lines = generate_lines(raw, value_width, value_width, &self.locale);
            if lines.is_empty() && !raw.is_empty() {
                wrapped.push(raw.clone());
            } else {
                wrapped.extend(lines);
            }
        }
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }

        // §4.7: any wrapped value segment carrying an escape sequence that
        // does not already end with RESET gets one appended, independent of
        // whether that sequence happens to be SGR (generate_lines only
        // balances SGR state, not e.g. a stray OSC-8 fragment).
        for segment in wrapped.iter_mut() {
            if !EscapeIndex::scan(segment).is_empty() && !segment.ends_with(RESET) {
                segment.push_str(RESET);
            }
        }

        let continuation_pad = " ".repeat(value_column.max(0) as usize);
        for (i, line) in wrapped.iter().enumerate() {
            let mut out = if i == 0 {
                let mut out = String::new();
                out.push_str(&label_cell);
                out.push_str(line);
                out
            } else {
                let mut out = String::with_capacity(continuation_pad.len() + line.len());
                out.push_str(&continuation_pad);
                out.push_str(line);
                out
            };
            if self.strip_ansi {
                out = EscapeIndex::plain_text(&out);
            }
            sink.write_line(&out);
        }
    }

    /// Builds the fixed-width label cell: head-clipped to `label_width`
    /// cells, right-padded, optionally accented, followed by the
    /// separator.
    fn format_label(&self, label: &str, label_width: i32) -> String {
        let width = label_width.max(0) as usize;
        let n = truncate_tail(label, 0, width);
        let clipped = &label[..n];
        let clipped_width = width_str(clipped);
        let pad = width.saturating_sub(clipped_width);

        let mut cell = String::new();
        let blank = label.trim().is_empty();
        if let Some(sgr) = &self.accent {
            if !blank {
                cell.push_str(sgr);
                cell.push_str(clipped);
                cell.push_str(RESET);
            } else {
                cell.push_str(clipped);
            }
        } else {
            cell.push_str(clipped);
        }
        cell.push_str(&" ".repeat(pad));
        cell.push_str(&self.separator);
        cell
    }
}
