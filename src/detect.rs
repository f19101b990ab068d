//! Input validation: file-name allow-listing and PDF header sniffing.

use crate::error::{Error, Result};
use std::path::Path;

/// Extensions accepted for upload, lower-case without the leading dot.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf"];

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Header information sniffed from the first bytes of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Check that a file name carries an accepted extension.
///
/// Only the extension is inspected; the content is checked separately by
/// [`sniff_header`].
///
/// # Example
/// ```
/// use enprint::detect::check_extension;
///
/// assert!(check_extension("paper.PDF").is_ok());
/// assert!(check_extension("paper.docx").is_err());
/// ```
pub fn check_extension(name: &str) -> Result<()> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(Error::UnsupportedExtension(name.to_string())),
    }
}

/// Sniff the PDF header from the beginning of a byte buffer.
///
/// # Returns
/// * `Ok(PdfHeader)` if the data starts with a valid PDF header
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
pub fn sniff_header(data: &[u8]) -> Result<PdfHeader> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

/// Validate both the file name and the content of an upload.
pub fn validate_upload(name: &str, data: &[u8]) -> Result<PdfHeader> {
    check_extension(name)?;
    sniff_header(data)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
