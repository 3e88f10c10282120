//! Interprets a tree of [`FormatValue`] tokens against the indent stack and
//! the string engine, emitting wrapped, padded lines to a sink.

use crate::error::FormatError;
use crate::escape::EscapeIndex;
use crate::external::LineSink;
use crate::indent::{FrameInfo, IndentFrameStack};
use crate::style::StyleConfig;
use crate::token::FormatValue;
use crate::wrap::generate_lines;

/// Cyclic or malicious token trees are cut off beyond this recursion depth,
/// shared with [`crate::traversal::ComplexTraversal`] so both components
/// agree on one guard.
pub const MAX_DEPTH: usize = 50;

/// Buffers text, tracks the indent stack, and emits wrapped, padded lines.
pub struct ComplexWriter<'a> {
    stack: IndentFrameStack,
    buffer: String,
    sink: &'a mut dyn LineSink,
    columns: i32,
    locale: String,
    strip_ansi: bool,
}

impl<'a> ComplexWriter<'a> {
    pub fn new(columns: i32, locale: impl Into<String>, sink: &'a mut dyn LineSink) -> Self {
        Self {
            stack: IndentFrameStack::new(),
            buffer: String::new(),
            sink,
            columns,
            locale: locale.into(),
            strip_ansi: false,
        }
    }

    /// Applies a [`StyleConfig`] snapshot: under `PlainText`/`Host` rendering,
    /// every line this writer emits has its escape sequences stripped before
    /// reaching the sink (§6).
    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.strip_ansi = style.plain_text_only();
        self
    }

    /// Processes a full token tree, flushing any trailing buffered text at
    /// the end.
    pub fn process(&mut self, tokens: &[FormatValue]) -> Result<(), FormatError> {
        self.process_at_depth(tokens, 0)?;
        self.flush();
        Ok(())
    }

    fn process_at_depth(&mut self, tokens: &[FormatValue], depth: usize) -> Result<(), FormatError> {
        for token in tokens {
            match token {
                FormatValue::Text(s) | FormatValue::PropertyValue(s) => {
                    self.buffer.push_str(s);
                }
                FormatValue::NewLine => {
                    self.flush();
                }
                FormatValue::Entry { frame, children } => {
                    if depth >= MAX_DEPTH {
                        tracing::warn!(depth, "recursion depth exceeded, dropping children");
                        continue;
                    }
                    match frame {
                        Some(f) => {
                            let _handle = self.stack.push(*f);
                            self.process_at_depth(children, depth + 1)?;
                        }
                        None => {
                            self.process_at_depth(children, depth + 1)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Flushes the pending buffer through the wrapper, emitting padded
    /// lines to the sink. Always clears the buffer, even on a degenerate
    /// (zero-or-negative useful width) flush.
    pub fn flush(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        if text.is_empty() {
            return;
        }

        let useful_width = self.stack.useful_width(self.columns);
        if useful_width <= 0 {
            tracing::debug!(useful_width, "layout degenerate, emitting nothing for flush");
            return;
        }

        let left = self.stack.left();
        let mut first_line = self.stack.first_line();
        if first_line.unsigned_abs() as i32 >= useful_width {
            first_line = 0;
        }

        let first_line_width = useful_width - first_line.max(0);
        let follow_width = useful_width + first_line.min(0);

        let lines = generate_lines(&text, first_line_width, follow_width, &self.locale);

        let first_pad = (left + first_line.max(0)).max(0) as usize;
        let follow_pad = (left - first_line.min(0)).max(0) as usize;

        for (i, line) in lines.iter().enumerate() {
            let pad = if i == 0 { first_pad } else { follow_pad };
            let mut padded = String::with_capacity(pad + line.len());
            padded.push_str(&" ".repeat(pad));
            padded.push_str(line);
            if self.strip_ansi {
                padded = EscapeIndex::plain_text(&padded);
            }
            self.sink.write_line(&padded);
        }
    }

    pub fn stack(&self) -> &IndentFrameStack {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::VecSink;

    #[test]
    fn plain_text_flush_emits_one_line() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(40, "en", &mut sink);
        writer
            .process(&[FormatValue::text("hello world"), FormatValue::NewLine])
            .unwrap();
        assert_eq!(sink.lines, vec!["hello world".to_string()]);
    }

    #[test]
    fn framed_entry_indents_its_children() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(40, "en", &mut sink);
        let tree = vec![FormatValue::framed(
            FrameInfo::new(0, 4, 0),
            vec![FormatValue::text("indented"), FormatValue::NewLine],
        )];
        writer.process(&tree).unwrap();
        assert_eq!(sink.lines, vec!["    indented".to_string()]);
    }

    #[test]
    fn frame_is_popped_after_children_processed() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(40, "en", &mut sink);
        let tree = vec![
            FormatValue::framed(
                FrameInfo::new(0, 4, 0),
                vec![FormatValue::text("inner"), FormatValue::NewLine],
            ),
            FormatValue::text("outer"),
            FormatValue::NewLine,
        ];
        writer.process(&tree).unwrap();
        assert_eq!(
            sink.lines,
            vec!["    inner".to_string(), "outer".to_string()]
        );
    }

    #[test]
    fn degenerate_width_emits_nothing() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(3, "en", &mut sink);
        let tree = vec![FormatValue::framed(
            FrameInfo::new(0, 5, 5),
            vec![FormatValue::text("never shown"), FormatValue::NewLine],
        )];
        writer.process(&tree).unwrap();
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn depth_beyond_limit_is_silently_dropped() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(80, "en", &mut sink);
        // Build a chain deeper than MAX_DEPTH; the innermost text must not
        // reach the sink.
        let mut tree = FormatValue::text("deepest");
        for _ in 0..(MAX_DEPTH + 5) {
            tree = FormatValue::group(vec![tree]);
        }
        writer.process(&[tree, FormatValue::NewLine]).unwrap();
        assert!(sink.lines.is_empty() || !sink.lines.iter().any(|l| l.contains("deepest")));
    }

    #[test]
    fn hanging_indent_pads_continuation_more_than_first_line() {
        let mut sink = VecSink::default();
        let mut writer = ComplexWriter::new(20, "en", &mut sink);
        let tree = vec![FormatValue::framed(
            FrameInfo::new(-2, 4, 0),
            vec![
                FormatValue::text("a long line that wraps across more than one output line"),
                FormatValue::NewLine,
            ],
        )];
        writer.process(&tree).unwrap();
        assert!(sink.lines.len() > 1);
        let first_indent = sink.lines[0].len() - sink.lines[0].trim_start().len();
        let second_indent = sink.lines[1].len() - sink.lines[1].trim_start().len();
        assert_eq!(first_indent, 4);
        assert_eq!(second_indent, 6);
    }

    #[test]
    fn plain_text_style_strips_escapes_from_emitted_lines() {
        use crate::style::{OutputRendering, StyleConfig};
        let mut sink = VecSink::default();
        let style = StyleConfig::new().with_rendering(OutputRendering::PlainText);
        let mut writer = ComplexWriter::new(40, "en", &mut sink).with_style(&style);
        writer
            .process(&[
                FormatValue::text("\x1b[31mred\x1b[0m text"),
                FormatValue::NewLine,
            ])
            .unwrap();
        assert_eq!(sink.lines, vec!["red text".to_string()]);
    }

    #[test]
    fn ansi_style_leaves_escapes_intact() {
        use crate::style::{OutputRendering, StyleConfig};
        let mut sink = VecSink::default();
        let style = StyleConfig::new().with_rendering(OutputRendering::Ansi);
        let mut writer = ComplexWriter::new(40, "en", &mut sink).with_style(&style);
        writer
            .process(&[
                FormatValue::text("\x1b[31mred\x1b[0m text"),
                FormatValue::NewLine,
            ])
            .unwrap();
        assert_eq!(sink.lines, vec!["\x1b[31mred\x1b[0m text".to_string()]);
    }
}
