//! Load-and-parse pipeline over a lopdf-backed document.

use std::io::Read;
use std::path::Path;

use crate::detect::{sniff_header, validate_upload};
use crate::error::{Error, Result};
use crate::model::{DeclaredMetadata, ExtractedText, PdfInfo};

use super::backend::LopdfBackend;
use super::metadata::{derive_info, read_declared_metadata};
use super::options::ParseOptions;
use super::text::extract_text_with_progress;

/// Everything derived from one uploaded document.
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    /// Best-effort bibliographic record
    pub info: PdfInfo,
    /// Raw Info-dictionary values
    pub declared: DeclaredMetadata,
    /// Extracted page text
    pub text: ExtractedText,
}

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let header = sniff_header(data)?;
        log::debug!("Loading {} ({} bytes)", header, data.len());
        let backend = LopdfBackend::load_bytes(data)?;
        if let Err(e) = backend.raw_doc().catalog() {
            return Err(Error::PdfParse(format!("missing document catalog: {}", e)));
        }
        Ok(Self { backend, options })
    }

    /// Validate an upload by name and content, then load it.
    pub fn from_upload(name: &str, data: &[u8], options: ParseOptions) -> Result<Self> {
        validate_upload(name, data)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Extract text and derive the bibliographic record.
    pub fn parse(&self, file_name: &str) -> Result<ParsedPdf> {
        self.parse_with_progress(file_name, |_, _| {})
    }

    /// Like [`parse`](Self::parse), reporting `(page, total)` as pages are read.
    pub fn parse_with_progress<F: FnMut(u32, u32)>(
        &self,
        file_name: &str,
        progress: F,
    ) -> Result<ParsedPdf> {
        let text = extract_text_with_progress(&self.backend, &self.options, progress)?;
        let declared = read_declared_metadata(&self.backend);
        let info = derive_info(
            &declared,
            &text,
            file_name,
            &self.options,
            chrono::Utc::now(),
        );
        Ok(ParsedPdf {
            info,
            declared,
            text,
        })
    }

    /// Borrow the document handle.
    pub fn backend(&self) -> &LopdfBackend {
        &self.backend
    }

    /// Give up the parser and keep the document handle.
    pub fn into_backend(self) -> LopdfBackend {
        self.backend
    }
}
