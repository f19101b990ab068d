//! Frequency-based keyword extraction.
//!
//! Text is normalized (NFKC, lower-case), split into alphanumeric tokens,
//! filtered against a fixed stopword set and ranked by how often each token
//! occurs. Ties keep first-occurrence order.
//!
//! ```
//! use enprint::keywords::extract_keywords;
//!
//! let text = "Graph coloring. Graph coloring heuristics for sparse graph instances.";
//! let keywords = extract_keywords(text, 2);
//! assert_eq!(keywords, vec!["graph", "coloring"]);
//! ```

pub mod stopwords;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Number of keywords attached to a parsed document by default.
pub const DEFAULT_KEYWORD_COUNT: i64 = 10;

static TOKEN_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn token_pattern() -> Option<&'static Regex> {
    TOKEN_PATTERN
        .get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").ok())
        .as_ref()
}

/// Token filtering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOptions {
    /// Tokens shorter than this many characters are ignored
    pub min_token_len: usize,

    /// Ignore tokens made only of digits (years, page numbers)
    pub skip_numeric: bool,

    /// Additional stopwords on top of the built-in set
    pub extra_stopwords: Vec<String>,
}

impl KeywordOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum token length.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Keep or drop purely numeric tokens.
    pub fn with_skip_numeric(mut self, skip: bool) -> Self {
        self.skip_numeric = skip;
        self
    }

    /// Add extra stopwords.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_stopwords
            .extend(words.into_iter().map(|w| w.into().to_lowercase()));
        self
    }
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            skip_numeric: true,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Keyword extractor with configurable token filtering.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    options: KeywordOptions,
    extra: HashSet<String>,
}

impl KeywordExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: KeywordOptions) -> Self {
        let extra = options.extra_stopwords.iter().cloned().collect();
        Self { options, extra }
    }

    /// Return up to `count` distinct keywords, most frequent first.
    ///
    /// Empty or whitespace-only text and non-positive counts yield an empty
    /// list.
    pub fn extract(&self, text: &str, count: i64) -> Vec<String> {
        if count <= 0 || text.trim().is_empty() {
            return Vec::new();
        }
        let Some(pattern) = token_pattern() else {
            return Vec::new();
        };

        let normalized: String = text.nfkc().collect::<String>().to_lowercase();

        // token -> (occurrences, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, m) in pattern.find_iter(&normalized).enumerate() {
            let token = m.as_str();
            if !self.keep(token) {
                continue;
            }
            counts
                .entry(token)
                .and_modify(|(n, _)| *n += 1)
                .or_insert((1, position));
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(token, (n, first))| (token, n, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        ranked
            .into_iter()
            .take(limit)
            .map(|(token, _, _)| token.to_string())
            .collect()
    }

    fn keep(&self, token: &str) -> bool {
        if token.chars().count() < self.options.min_token_len {
            return false;
        }
        if self.options.skip_numeric && token.chars().all(|c| c.is_numeric()) {
            return false;
        }
        !stopwords::is_stopword(token) && !self.extra.contains(token)
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(KeywordOptions::default())
    }
}

/// Extract up to `count` keywords with the default options.
pub fn extract_keywords(text: &str, count: i64) -> Vec<String> {
    KeywordExtractor::default().extract(text, count)
}
