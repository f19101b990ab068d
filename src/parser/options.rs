//! Parsing options.

use crate::keywords::{KeywordOptions, DEFAULT_KEYWORD_COUNT};

/// Options for text extraction and metadata derivation.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for per-page text extraction
    pub error_mode: ErrorMode,

    /// Number of keywords to attach to the record
    pub keyword_count: i64,

    /// Keyword token filtering
    pub keyword_options: KeywordOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose text cannot be read).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the keyword count.
    pub fn with_keyword_count(mut self, count: i64) -> Self {
        self.keyword_count = count;
        self
    }

    /// Set keyword filtering options.
    pub fn with_keyword_options(mut self, options: KeywordOptions) -> Self {
        self.keyword_options = options;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            keyword_options: KeywordOptions::default(),
        }
    }
}

/// Error handling mode during text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Skip unreadable pages and continue
    Lenient,
}
