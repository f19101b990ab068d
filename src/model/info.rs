//! Bibliographic record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default BibTeX entry type for uploaded preprints.
pub const DEFAULT_ART_TYPE: &str = "article";

/// Metadata a PDF declares about itself in its Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredMetadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords as declared by the producer (free text)
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

/// Text pulled out of a document, page by page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Text of the first page only
    pub first_page: String,

    /// Concatenated text of every page that was read
    pub text: String,

    /// Number of pages whose text was read
    pub pages_read: u32,
}

impl ExtractedText {
    /// Check whether no text was found at all.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Best-effort bibliographic record derived from an uploaded document.
///
/// Built once per document and never mutated afterwards; the editable copy
/// lives in a [`BibTexEntry`](super::BibTexEntry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfInfo {
    /// BibTeX entry type, always "article" for preprints
    pub art_type: String,

    /// Citation tag: whitespace-stripped author (or title) plus the year
    pub art_title: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,

    /// Issue number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Page count
    pub pages: u32,

    pub date: DateTime<Utc>,

    /// Most frequent content words, most relevant first
    pub keywords: Vec<String>,
}

impl PdfInfo {
    /// Four-digit year of the record's date.
    pub fn year(&self) -> String {
        use chrono::Datelike;
        format!("{:04}", self.date.year())
    }
}
