//! Editable BibTeX entry.

use super::PdfInfo;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// A single BibTeX entry: type, citation key and an ordered field map.
///
/// Field names are case-insensitive and stored lower-cased. There is no
/// schema; whatever the user fills in is written out. Two entries are equal
/// when type, key and field values match, in any field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BibTexEntry {
    /// Entry type without the leading `@` (e.g., "article")
    pub entry_type: String,

    /// Citation key
    pub key: String,

    fields: Vec<(String, String)>,
}

impl BibTexEntry {
    /// Create an entry with no fields.
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Prefill an entry from a derived record, the way the form presents it.
    ///
    /// Absent optional values are left out so the user can add them.
    pub fn from_info(info: &PdfInfo) -> Self {
        let mut entry = Self::new(&info.art_type, &info.art_title);

        if let Some(ref author) = info.author {
            entry.set("author", author);
        }
        entry.set("title", &info.title);
        if let Some(ref journal) = info.journal {
            entry.set("journal", journal);
        }
        if let Some(volume) = info.volume {
            entry.set("volume", volume.to_string());
        }
        if let Some(number) = info.number {
            entry.set("number", number.to_string());
        }
        entry.set("numpages", info.pages.to_string());
        entry.set("year", info.year());
        entry.set("month", MONTHS[info.date.month0() as usize]);
        if let Some(ref issn) = info.issn {
            entry.set("issn", issn);
        }
        if let Some(ref doi) = info.doi {
            entry.set("doi", doi);
        }
        if !info.keywords.is_empty() {
            entry.set("keywords", info.keywords.join(", "));
        }

        entry
    }

    /// Set a field, replacing any previous value in place.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().trim().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        let pos = self.fields.iter().position(|(n, _)| *n == name)?;
        Some(self.fields.remove(pos).1)
    }

    /// Apply a `field=value` assignment. An empty value removes the field.
    ///
    /// Returns `false` when the text has no `=` or an empty field name.
    pub fn apply_assignment(&mut self, assignment: &str) -> bool {
        let Some((name, value)) = assignment.split_once('=') else {
            return false;
        };
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let value = value.trim();
        if value.is_empty() {
            self.remove(name);
        } else {
            self.set(name, value);
        }
        true
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the entry has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for BibTexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.key == other.key
            && self.fields.len() == other.fields.len()
            && self
                .fields()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for BibTexEntry {}
