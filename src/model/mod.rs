//! Record types shared by the parser, the annotation writer and the session.

mod bibtex;
mod info;

pub use bibtex::BibTexEntry;
pub use info::{DeclaredMetadata, ExtractedText, PdfInfo, DEFAULT_ART_TYPE};
