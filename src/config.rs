//! Startup configuration.

use std::time::Duration;

use crate::keywords::{KeywordOptions, DEFAULT_KEYWORD_COUNT};
use crate::parser::{ErrorMode, ParseOptions};

/// Health-check endpoint polled for the connectivity indicator.
pub const DEFAULT_API_URL: &str = "http://localhost:9000/testAPI";

/// Default time to wait for the health-check endpoint.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Application configuration, built once at startup and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    /// Health-check URL
    pub api_url: String,

    /// How long the health check may take before counting as disconnected
    pub health_timeout: Duration,

    /// Number of keywords derived per document
    pub keyword_count: i64,

    /// Keyword token filtering
    pub keyword_options: KeywordOptions,

    /// How unreadable pages are handled
    pub error_mode: ErrorMode,

    /// Name stored on the annotation instead of the file name
    pub display_name: Option<String>,

    /// Colored terminal output
    pub color: bool,
}

impl Config {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health-check URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the health-check timeout.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
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

    /// Set the page error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Override the annotation display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Enable or disable colored output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Parse options derived from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_error_mode(self.error_mode)
            .with_keyword_count(self.keyword_count)
            .with_keyword_options(self.keyword_options.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            keyword_options: KeywordOptions::default(),
            error_mode: ErrorMode::Lenient,
            display_name: None,
            color: true,
        }
    }
}
