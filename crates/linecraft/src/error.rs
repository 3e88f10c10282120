//! Error kinds for the layout core.
//!
//! These are not exceptions in the host-language sense: per-cell errors
//! (expression evaluation, formatting) never abort the output stream and are
//! recorded through [`ErrorManager`] rather than returned; layout-degenerate
//! and depth-exceeded conditions are silent to the caller but observable via
//! `tracing`; cancellation and argument-contract violations are fatal and
//! returned as `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("expression evaluation failed: {0}")]
    ExpressionEvaluation(String),

    #[error("formatting failed: {0}")]
    Formatting(String),

    #[error("layout degenerate: useful width <= 0")]
    LayoutDegenerate,

    #[error("recursion depth exceeded ({0})")]
    DepthExceeded(usize),

    #[error("pipeline cancelled")]
    PipelineCancelled,

    #[error("argument contract violation: {0}")]
    ArgumentContract(String),
}

/// Replacement policy for a failed per-cell evaluation or format operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Replace the failing cell with a configured error string instead of
    /// leaving it empty.
    pub display_error_strings: bool,
    /// Render recorded errors as inline messages in the output stream
    /// (rather than only through a side channel).
    pub show_errors_as_messages: bool,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self {
            display_error_strings: true,
            show_errors_as_messages: false,
        }
    }
}

/// Records per-cell errors (kinds 1 and 2) without aborting the stream.
///
/// One instance is owned by a single render pass; it never shares mutable
/// state across instances (§5).
#[derive(Debug, Default)]
pub struct ErrorManager {
    policy: ErrorPolicy,
    recorded: Vec<FormatError>,
}

impl ErrorManager {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            recorded: Vec::new(),
        }
    }

    /// Records an expression-evaluation or formatting error and returns the
    /// replacement text for the offending cell, per policy.
    pub fn record(&mut self, err: FormatError, error_string: &str) -> Option<String> {
        tracing::debug!(error = %err, "recording per-cell format error");
        let replacement = if self.policy.display_error_strings {
            Some(error_string.to_string())
        } else {
            None
        };
        self.recorded.push(err);
        replacement
    }

    pub fn recorded(&self) -> &[FormatError] {
        &self.recorded
    }

    pub fn has_errors(&self) -> bool {
        !self.recorded.is_empty()
    }
}
