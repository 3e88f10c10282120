//! # linecraft - escape-aware terminal text layout core
//!
//! `linecraft` measures, wraps, and lays out already-evaluated formatting
//! tokens into terminal-ready lines. It is the hard core of an
//! object-to-terminal rendering pipeline: it does not evaluate object
//! properties, does not parse a view/control database, and does not own a
//! CLI surface — those are external collaborators (see [`external`]) that
//! a caller wires in.
//!
//! ## Core Concepts
//!
//! - [`cells`]: display-cell width measurement, East-Asian-wide aware
//! - [`escape`]: a single-pass ANSI/SGR/OSC-8 escape-sequence scanner
//! - [`wrap`]: line splitting, word splitting, and width-aware wrapping that
//!   preserves SGR state across every line break it introduces
//! - [`indent`]: a scoped indentation-frame stack for left/right margins and
//!   hanging first-line indent
//! - [`columns`]: the auto-sizing column-width solver for table layout
//! - [`writer`]: [`writer::ComplexWriter`] interprets a [`token::FormatValue`]
//!   tree against the indent stack and the wrapper, emitting padded lines
//! - [`list`]: aligned "label : value" list rendering
//! - [`grouping`]: idempotent grouping-key change detection
//! - [`traversal`]: depth-bounded control-tree walk with a property-walker
//!   fallback for objects with no matching view
//! - [`view`]: the facade selecting among table/list/complex rendering
//!
//! ## Quick Start
//!
//! ```rust
//! use linecraft::wrap::generate_lines;
//!
//! let lines = generate_lines("hello world foo bar", 10, 10, "en");
//! assert_eq!(lines, vec!["hello", "world foo", "bar"]);
//! ```
//!
//! Wrapping a CJK string with no word-wrap locale falls back to
//! character-level splitting at exact cell boundaries:
//!
//! ```rust
//! use linecraft::wrap::generate_lines;
//!
//! let lines = generate_lines("日本語テスト", 4, 4, "ja");
//! assert_eq!(lines, vec!["日本", "語テ", "スト"]);
//! ```
//!
//! ## Indentation frames
//!
//! ```rust
//! use linecraft::indent::{FrameInfo, IndentFrameStack};
//!
//! let mut stack = IndentFrameStack::new();
//! {
//!     let _h = stack.push(FrameInfo { first_line: -2, left_indent: 4, right_indent: 0 });
//!     assert_eq!(stack.left(), 4);
//!     assert_eq!(stack.first_line(), -2);
//! }
//! assert_eq!(stack.left(), 0);
//! ```

pub mod cancel;
pub mod cells;
pub mod columns;
pub mod error;
pub mod escape;
pub mod external;
pub mod grouping;
pub mod indent;
pub mod list;
pub mod style;
pub mod token;
pub mod traversal;
pub mod view;
pub mod wrap;
pub mod writer;

pub use cancel::CancellationToken;
pub use cells::{head_split, truncate_tail, width_char, width_str};
pub use columns::{format_cell, solve_column_widths, Alignment, ColumnInfo};
pub use error::{ErrorManager, ErrorPolicy, FormatError};
pub use escape::{EscapeIndex, EscapeSpan, RESET};
pub use external::{
    EvalResult, ExpressionEvaluator, IdentityStringTable, LineSink, ObjectSource, StringTable,
    VecSink, ViewDatabase,
};
pub use grouping::GroupingTracker;
pub use indent::{FrameHandle, FrameInfo, IndentFrameStack};
pub use list::{ListEntry, ListWriter};
pub use style::{OutputRendering, StyleConfig};
pub use token::FormatValue;
pub use traversal::{ComplexTraversal, ControlToken};
pub use view::{ComplexView, ListView, TableHeaderInfo, TableView, ViewContext, ViewVariant};
pub use wrap::{generate_lines, get_words, split_lines, truncate_at_newline, uses_word_wrap};
pub use writer::ComplexWriter;
