//! BibTeX entry parsing.
//!
//! Parsing goes through `biblatex`, which handles `@string` abbreviations,
//! comments, quoted and braced values and LaTeX escapes. Field values are
//! flattened back to plain text.

use biblatex::{Bibliography, ChunksExt};

use crate::error::{Error, Result};
use crate::model::BibTexEntry;

/// Parse the first BibTeX entry found in `input`.
pub fn parse_bibtex(input: &str) -> Result<BibTexEntry> {
    let bibliography =
        Bibliography::parse(input).map_err(|e| Error::BibTex(format!("{}", e)))?;

    let entry = bibliography
        .iter()
        .next()
        .ok_or_else(|| Error::BibTex("no entry found".to_string()))?;

    let mut parsed = BibTexEntry::new(entry.entry_type.to_string(), entry.key.clone());
    for (name, chunks) in &entry.fields {
        parsed.set(name, chunks.format_verbatim());
    }
    Ok(parsed)
}
