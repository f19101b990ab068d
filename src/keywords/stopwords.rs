//! Fixed stopword set used for keyword ranking.
//!
//! The English list from the `stop-words` crate, extended with tokens that
//! show up on nearly every page of a preprint (figure captions, reference
//! boilerplate, URL fragments) and therefore never make useful keywords.

use std::collections::HashSet;
use std::sync::OnceLock;

use stop_words::LANGUAGE;

/// Preprint boilerplate treated as stopwords on top of the English list.
const ACADEMIC_STOPWORDS: &[&str] = &[
    "al", "et", "eq", "eqs", "fig", "figs", "figure", "figures", "table", "tables", "section",
    "sections", "doi", "arxiv", "preprint", "http", "https", "www", "org", "com", "pp", "vol",
    "ibid", "cf", "ie", "eg", "etc", "also", "however", "thus", "using", "used", "use", "can",
    "may", "one", "two", "three", "paper", "results", "show", "shown",
];

static ENGLISH: OnceLock<HashSet<String>> = OnceLock::new();

/// The default stopword set, built once and shared.
pub fn english() -> &'static HashSet<String> {
    ENGLISH.get_or_init(|| {
        let mut set: HashSet<String> = stop_words::get(LANGUAGE::English)
            .iter()
            .map(|w| w.to_string().to_lowercase())
            .collect();
        set.extend(ACADEMIC_STOPWORDS.iter().map(|w| w.to_string()));
        log::debug!("Loaded {} stopwords", set.len());
        set
    })
}

/// Check if a lower-cased token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    english().contains(token)
}
