//! # enprint
//!
//! Enhanced preprint generator: turn a PDF preprint into a self-describing
//! one by embedding its BibTeX citation inside the file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use enprint::{parse_file, write_bibtex_annotation, BibTexEntry, LopdfBackend};
//!
//! fn main() -> enprint::Result<()> {
//!     // Derive the bibliographic record
//!     let parsed = parse_file("preprint.pdf")?;
//!     println!("{} ({})", parsed.info.title, parsed.info.art_title);
//!
//!     // Prefill, edit and embed
//!     let mut entry = BibTexEntry::from_info(&parsed.info);
//!     entry.set("journal", "Journal of Examples");
//!
//!     let mut doc = LopdfBackend::load_file("preprint.pdf")?;
//!     let bytes = write_bibtex_annotation(&mut doc, "preprint.pdf", &entry)?;
//!     std::fs::write("preprint_enhanced.pdf", bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Metadata derivation**: title, author, date and page count with
//!   file-name and clock fallbacks
//! - **Keywords**: frequency-ranked terms with stopword filtering
//! - **BibTeX**: prefill, render and parse entries
//! - **Annotation**: hidden first-page annotation plus an Info mirror
//! - **Session**: an explicit load/submit/reset state machine

pub mod annotate;
pub mod config;
pub mod detect;
pub mod error;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use annotate::{
    read_bibtex_annotations, read_info_bibtex, write_bibtex_annotation, BibTexAnnotation,
};
pub use config::Config;
pub use detect::{check_extension, sniff_header, validate_upload, PdfHeader};
pub use error::{Error, Result};
pub use keywords::{extract_keywords, KeywordExtractor, KeywordOptions};
pub use model::{BibTexEntry, DeclaredMetadata, ExtractedText, PdfInfo};
pub use parser::{
    parse_bibtex, ErrorMode, LopdfBackend, ParseOptions, ParsedPdf, PdfBackend, PdfParser,
};
pub use render::{to_bibtex, to_json, JsonFormat};
pub use session::{Output, Session, SessionEvent, Transition};

use std::path::Path;

/// Parse a PDF file and derive its bibliographic record.
///
/// The file name (not the full path) is used for the title fallback.
///
/// # Example
///
/// ```no_run
/// use enprint::parse_file;
///
/// let parsed = parse_file("preprint.pdf").unwrap();
/// println!("Pages: {}", parsed.info.pages);
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedPdf> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use enprint::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().with_keyword_count(5);
/// let parsed = parse_file_with_options("preprint.pdf", options).unwrap();
/// assert!(parsed.info.keywords.len() <= 5);
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParsedPdf> {
    let path = path.as_ref();
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse(&file_name(path))
}

/// Parse an upload given its name and content.
///
/// The name must carry a `.pdf` extension and the content must start with
/// a PDF header.
///
/// # Example
///
/// ```no_run
/// use enprint::parse_bytes;
///
/// let data = std::fs::read("preprint.pdf").unwrap();
/// let parsed = parse_bytes("preprint.pdf", &data).unwrap();
/// ```
pub fn parse_bytes(name: &str, data: &[u8]) -> Result<ParsedPdf> {
    parse_bytes_with_options(name, data, ParseOptions::default())
}

/// Parse an upload with custom options.
pub fn parse_bytes_with_options(name: &str, data: &[u8], options: ParseOptions) -> Result<ParsedPdf> {
    let parser = PdfParser::from_upload(name, data, options)?;
    parser.parse(name)
}

/// Read a file and load it into a session.
///
/// Returns the failed session rather than an error when the document
/// cannot be read, matching [`Session::load`].
pub fn load_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<Session> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    Ok(Session::new().load(file_name(path), &bytes, config).session)
}

/// Asynchronously read a file and load it into a session.
#[cfg(feature = "async")]
pub async fn load_file_async<P: AsRef<Path>>(path: P, config: &Config) -> Result<Session> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    Ok(Session::new().load(file_name(path), &bytes, config).session)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
