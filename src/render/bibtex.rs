//! BibTeX text rendering.

use biblatex::{Chunk, Entry, EntryType, Spanned};

use crate::error::{Error, Result};
use crate::model::BibTexEntry;

/// Characters that end or confuse a citation key when read back.
const KEY_RESERVED: &[char] = &[',', '{', '}', '(', ')', '"', '=', '#', '%', '\\'];

const FALLBACK_KEY: &str = "untitled";

/// Serialize an entry as BibTeX text.
///
/// Field values are escaped by `biblatex`, so [`parse_bibtex`] gives back
/// the same values. The citation key loses whitespace and the characters
/// BibTeX reserves (`Doe, Jane2021` becomes `DoeJane2021`), and an empty
/// type is written as `misc`.
///
/// [`parse_bibtex`]: crate::parser::parse_bibtex
///
/// ```
/// use enprint::model::BibTexEntry;
/// use enprint::render::to_bibtex;
///
/// let mut entry = BibTexEntry::new("article", "Doe2021");
/// entry.set("title", "Sparse Widgets");
/// let text = to_bibtex(&entry).unwrap();
/// assert!(text.starts_with("@article{Doe2021,"));
/// assert!(text.contains("Sparse Widgets"));
/// ```
pub fn to_bibtex(entry: &BibTexEntry) -> Result<String> {
    let entry_type = if entry.entry_type.is_empty() {
        "misc"
    } else {
        entry.entry_type.as_str()
    };

    let mut bib = Entry {
        key: citation_key(&entry.key),
        entry_type: EntryType::new(entry_type),
        fields: Default::default(),
    };
    for (name, value) in entry.fields() {
        bib.fields.insert(
            name.to_string(),
            vec![Spanned::detached(Chunk::Normal(value.to_string()))],
        );
    }

    let mut text = bib
        .to_bibtex_string()
        .map_err(|e| Error::Render(format!("cannot write @{}: {:?}", entry_type, e)))?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Strip whitespace and reserved characters from a citation key.
pub fn citation_key(key: &str) -> String {
    let key: String = key
        .chars()
        .filter(|c| !c.is_whitespace() && !KEY_RESERVED.contains(c))
        .collect();
    if key.is_empty() {
        FALLBACK_KEY.to_string()
    } else {
        key
    }
}
