//! Sequential page-by-page text extraction.

use crate::error::Result;
use crate::model::ExtractedText;

use super::backend::PdfBackend;
use super::options::{ErrorMode, ParseOptions};

/// Extract the text of a document, one page at a time in page order.
pub fn extract_text<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &ParseOptions,
) -> Result<ExtractedText> {
    extract_text_with_progress(backend, options, |_, _| {})
}

/// Extract text, calling `progress(page, total)` after each page is read.
///
/// In [`ErrorMode::Strict`] the first unreadable page aborts extraction;
/// in [`ErrorMode::Lenient`] it is logged and skipped.
pub fn extract_text_with_progress<B, F>(
    backend: &B,
    options: &ParseOptions,
    mut progress: F,
) -> Result<ExtractedText>
where
    B: PdfBackend + ?Sized,
    F: FnMut(u32, u32),
{
    let pages = backend.pages();
    let total = pages.len() as u32;

    let mut extracted = ExtractedText::default();

    for (index, page_num) in pages.keys().enumerate() {
        let page_num = *page_num;
        match backend.page_text(page_num) {
            Ok(page_text) => {
                let page_text = page_text.trim();
                if index == 0 {
                    extracted.first_page = page_text.to_string();
                }
                if !page_text.is_empty() {
                    if !extracted.text.is_empty() {
                        extracted.text.push(' ');
                    }
                    extracted.text.push_str(page_text);
                }
                extracted.pages_read += 1;
            }
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }
        progress(index as u32 + 1, total);
    }

    log::debug!(
        "Extracted {} characters from {} of {} pages",
        extracted.text.len(),
        extracted.pages_read,
        total
    );

    Ok(extracted)
}
