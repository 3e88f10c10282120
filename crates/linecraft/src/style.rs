//! The per-process style configuration collaborator (§6).
//!
//! Modeled as an immutable snapshot taken once at the start of a render and
//! passed by reference through the call chain, per Design Note "Global style
//! singleton" — never a mutable global read mid-stream.

use serde::{Deserialize, Serialize};

/// How escape sequences in the final rendered output should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputRendering {
    /// Detect based on the destination (TTY vs. redirected); engine callers
    /// resolve this before constructing a [`StyleConfig`] — the core never
    /// inspects the environment itself.
    Automatic,
    /// Strip all escape sequences from the final rendered output.
    PlainText,
    /// Emit ANSI escape sequences.
    Ansi,
    /// Defer to the host terminal's own styling (no sequences emitted by
    /// this engine; equivalent to `PlainText` from this crate's standpoint).
    Host,
}

impl Default for OutputRendering {
    fn default() -> Self {
        OutputRendering::Automatic
    }
}

/// An immutable snapshot of the accent strings and rendering mode in effect
/// for one render pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// SGR string applied to accented text (e.g. list-writer labels).
    pub accent: String,
    /// SGR string applied to recorded error text.
    pub error: String,
    /// SGR string applied to table headers.
    pub table_header: String,
    /// SGR string applied to file-info extensions (mirrors the host
    /// pipeline's file-listing formatter, out of scope here but part of the
    /// shared style snapshot contract).
    pub file_info_extension: String,
    pub rendering: OutputRendering,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            accent: String::new(),
            error: String::new(),
            table_header: String::new(),
            file_info_extension: String::new(),
            rendering: OutputRendering::default(),
        }
    }
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accent(mut self, sgr: impl Into<String>) -> Self {
        self.accent = sgr.into();
        self
    }

    pub fn with_error(mut self, sgr: impl Into<String>) -> Self {
        self.error = sgr.into();
        self
    }

    pub fn with_table_header(mut self, sgr: impl Into<String>) -> Self {
        self.table_header = sgr.into();
        self
    }

    pub fn with_rendering(mut self, mode: OutputRendering) -> Self {
        self.rendering = mode;
        self
    }

    /// Whether the engine should strip escape sequences from the output it
    /// produces under this configuration.
    pub fn plain_text_only(&self) -> bool {
        matches!(
            self.rendering,
            OutputRendering::PlainText | OutputRendering::Host
        )
    }

    /// Loads a style configuration from a YAML document, mirroring the
    /// teacher's `Theme::from_yaml` convenience constructor.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
