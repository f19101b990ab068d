//! Error types for the enprint library.

use std::io;
use thiserror::Error;

/// Result type alias for enprint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, parsing or annotating a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The file name does not carry an accepted extension.
    #[error("Unsupported file type: {0} (expected a .pdf file)")]
    UnsupportedExtension(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error attaching or reading the BibTeX annotation.
    #[error("Annotation error: {0}")]
    Annotation(String),

    /// Malformed BibTeX text.
    #[error("BibTeX error: {0}")]
    BibTex(String),

    /// Error during rendering (JSON, BibTeX).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
