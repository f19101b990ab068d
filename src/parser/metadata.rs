//! Bibliographic metadata derivation.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::keywords::KeywordExtractor;
use crate::model::{DeclaredMetadata, ExtractedText, PdfInfo, DEFAULT_ART_TYPE};

use super::backend::PdfBackend;
use super::options::ParseOptions;

/// Read what the document declares about itself.
pub fn read_declared_metadata<B: PdfBackend + ?Sized>(backend: &B) -> DeclaredMetadata {
    let non_blank = |key: &[u8]| {
        backend
            .info_string(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    DeclaredMetadata {
        title: non_blank(b"Title"),
        author: non_blank(b"Author"),
        subject: non_blank(b"Subject"),
        keywords: non_blank(b"Keywords"),
        creator: non_blank(b"Creator"),
        producer: non_blank(b"Producer"),
        created: backend
            .info_string(b"CreationDate")
            .and_then(|s| parse_pdf_date(&s)),
        modified: backend
            .info_string(b"ModDate")
            .and_then(|s| parse_pdf_date(&s)),
        pdf_version: backend.version(),
        page_count: backend.page_count(),
        encrypted: backend.is_encrypted(),
    }
}

/// Derive the bibliographic record of a loaded document, dated "now" when
/// the document declares no creation date.
pub fn parse_pdf<B: PdfBackend + ?Sized>(
    backend: &B,
    text: &ExtractedText,
    file_name: &str,
    options: &ParseOptions,
) -> PdfInfo {
    let declared = read_declared_metadata(backend);
    derive_info(&declared, text, file_name, options, Utc::now())
}

/// Derive a record from declared metadata and extracted text.
///
/// Never fails: missing values are replaced by defaults (file-name title,
/// `now` as the date) or left unset for the user to fill in.
pub fn derive_info(
    declared: &DeclaredMetadata,
    text: &ExtractedText,
    file_name: &str,
    options: &ParseOptions,
    now: DateTime<Utc>,
) -> PdfInfo {
    let author = declared.author.clone();
    let title = declared
        .title
        .clone()
        .unwrap_or_else(|| fallback_title(file_name));
    let date = declared.created.unwrap_or(now);
    let art_title = article_tag(author.as_deref().unwrap_or(&title), &date);

    let keywords = KeywordExtractor::new(options.keyword_options.clone())
        .extract(&text.text, options.keyword_count);
    log::debug!("Keywords for {}: {:?}", file_name, keywords);

    PdfInfo {
        art_type: DEFAULT_ART_TYPE.to_string(),
        art_title,
        title,
        volume: None,
        issn: None,
        number: None,
        journal: None,
        doi: None,
        author,
        pages: declared.page_count,
        date,
        keywords,
    }
}

/// File name with its last four characters (the ".pdf" extension) removed.
pub fn fallback_title(file_name: &str) -> String {
    let len = file_name.chars().count();
    file_name.chars().take(len.saturating_sub(4)).collect()
}

/// Citation tag: the source text with all whitespace removed, followed by
/// the four-digit year.
pub fn article_tag(author_or_title: &str, date: &DateTime<Utc>) -> String {
    let stripped: String = author_or_title
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{}{:04}", stripped, date.year())
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`) into UTC.
///
/// Every component after the year is optional. The timezone suffix may be
/// `Z`, `+HH'mm'` or `-HH'mm'`; without one the time is taken as UTC.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, tz) = s.split_at(digits_end);
    if digits.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> u32 {
        digits
            .get(range)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let naive = NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))?.and_hms_opt(
        field(8..10, 0),
        field(10..12, 0),
        field(12..14, 0),
    )?;

    let offset = parse_tz_offset(tz)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the timezone suffix of a PDF date.
fn parse_tz_offset(tz: &str) -> Option<FixedOffset> {
    let mut chars = tz.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return FixedOffset::east_opt(0),
    };

    let rest: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = rest.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: i32 = rest.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Format a timestamp as a PDF date string.
pub fn format_pdf_date(date: &DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}
