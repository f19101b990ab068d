//! PDF loading, text extraction, metadata derivation and BibTeX parsing.

pub mod backend;
mod bibtex;
mod metadata;
mod options;
mod pdf_parser;
mod text;

pub use backend::{LopdfBackend, PdfBackend};
pub use bibtex::parse_bibtex;
pub use metadata::{
    article_tag, derive_info, fallback_title, format_pdf_date, parse_pdf, parse_pdf_date,
    read_declared_metadata,
};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::{ParsedPdf, PdfParser};
pub use text::{extract_text, extract_text_with_progress};
