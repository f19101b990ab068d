//! Embedding BibTeX into a document as a hidden annotation.
//!
//! The entry is written to the first page as a `/Text` annotation with a
//! zero-size rectangle and the Hidden and NoView flags set, so viewers do not
//! draw it. The same text is mirrored into the Info dictionary under
//! `/BibTeX`. Submitting again replaces the previous annotation.

use chrono::{DateTime, Utc};
use lopdf::{dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::BibTexEntry;
use crate::parser::backend::{dict_string, encode_pdf_string, LopdfBackend, PdfBackend};
use crate::parser::{format_pdf_date, parse_bibtex, parse_pdf_date};
use crate::render::to_bibtex;

/// `/NM` value identifying annotations written by this crate.
pub const ANNOTATION_NAME: &str = "enprint-bibtex";

/// Info dictionary key holding the mirrored BibTeX text.
pub const INFO_KEY: &str = "BibTeX";

// Annotation flags: Hidden (bit 2) | NoView (bit 6)
const ANNOTATION_FLAGS: i64 = 2 | 32;

/// A BibTeX annotation read back from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct BibTexAnnotation {
    /// Page the annotation is attached to (1-indexed)
    pub page: u32,
    /// Display name stored in `/T`
    pub display_name: Option<String>,
    /// Modification date stored in `/M`
    pub modified: Option<DateTime<Utc>>,
    /// Raw BibTeX text stored in `/Contents`
    pub raw: String,
    /// Parsed entry
    pub entry: BibTexEntry,
}

/// Attach `entry` to the document and return the saved bytes.
///
/// Mutates the in-memory document. Whatever fields are present are
/// written; nothing is validated.
pub fn write_bibtex_annotation(
    backend: &mut LopdfBackend,
    display_name: &str,
    entry: &BibTexEntry,
) -> Result<Vec<u8>> {
    let bibtex = to_bibtex(entry)?;
    attach_bibtex(backend.raw_doc_mut(), display_name, &bibtex, Utc::now())?;
    let bytes = backend.save_to_bytes()?;
    log::debug!(
        "Wrote BibTeX annotation for {} ({} fields, {} bytes)",
        display_name,
        entry.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Attach raw BibTeX text to the first page of `doc`.
pub fn attach_bibtex(
    doc: &mut LopdfDocument,
    display_name: &str,
    bibtex: &str,
    now: DateTime<Utc>,
) -> Result<ObjectId> {
    let page_id = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| Error::Annotation("document has no pages".to_string()))?;

    let existing = page_annotations(doc, page_id);
    let (stale, mut kept): (Vec<Object>, Vec<Object>) = existing
        .into_iter()
        .partition(|annot| is_own_annotation(doc, annot));
    for annot in &stale {
        if let Object::Reference(id) = annot {
            doc.objects.remove(id);
        }
    }
    if !stale.is_empty() {
        log::debug!("Replacing {} previous BibTeX annotation(s)", stale.len());
    }

    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Rect" => vec![0.into(), 0.into(), 0.into(), 0.into()],
        "F" => ANNOTATION_FLAGS,
        "Open" => false,
        "P" => page_id,
        "NM" => Object::string_literal(ANNOTATION_NAME),
        "T" => encode_pdf_string(display_name),
        "M" => Object::string_literal(format_pdf_date(&now)),
        "Contents" => encode_pdf_string(bibtex),
    });
    kept.push(Object::Reference(annot_id));

    doc.get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| Error::Annotation(format!("page dictionary unavailable: {}", e)))?
        .set("Annots", Object::Array(kept));

    set_info_entry(doc, INFO_KEY, encode_pdf_string(bibtex))?;

    Ok(annot_id)
}

/// Read back every BibTeX annotation written by this crate.
///
/// Annotations whose contents no longer parse are skipped with a warning.
pub fn read_bibtex_annotations(backend: &LopdfBackend) -> Vec<BibTexAnnotation> {
    let doc = backend.raw_doc();
    let mut found = Vec::new();

    for (page_num, page_id) in backend.pages() {
        for annot in page_annotations(doc, page_id) {
            let Some(dict) = resolve_dict(doc, &annot) else {
                continue;
            };
            if dict_string(dict, b"NM").as_deref() != Some(ANNOTATION_NAME) {
                continue;
            }
            let Some(raw) = dict_string(dict, b"Contents") else {
                continue;
            };
            match parse_bibtex(&raw) {
                Ok(entry) => found.push(BibTexAnnotation {
                    page: page_num,
                    display_name: dict_string(dict, b"T"),
                    modified: dict_string(dict, b"M").and_then(|m| parse_pdf_date(&m)),
                    raw,
                    entry,
                }),
                Err(e) => log::warn!("Unreadable BibTeX annotation on page {}: {}", page_num, e),
            }
        }
    }

    found
}

/// Read the BibTeX text mirrored into the Info dictionary.
pub fn read_info_bibtex(backend: &LopdfBackend) -> Option<BibTexEntry> {
    let raw = backend.info_string(INFO_KEY.as_bytes())?;
    parse_bibtex(&raw).ok()
}

/// The page's `/Annots` entries, resolving an indirect array.
fn page_annotations(doc: &LopdfDocument, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let annots = match page.get(b"Annots") {
        Ok(Object::Reference(id)) => doc.get_object(*id).ok(),
        Ok(other) => Some(other),
        Err(_) => None,
    };
    annots
        .and_then(|a| a.as_array().ok())
        .cloned()
        .unwrap_or_default()
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a lopdf::Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn is_own_annotation(doc: &LopdfDocument, annot: &Object) -> bool {
    resolve_dict(doc, annot)
        .and_then(|dict| dict_string(dict, b"NM"))
        .is_some_and(|nm| nm == ANNOTATION_NAME)
}

/// Set an Info dictionary entry, creating the dictionary if needed.
fn set_info_entry(doc: &mut LopdfDocument, key: &str, value: Object) -> Result<()> {
    enum InfoLocation {
        Indirect(ObjectId),
        Direct,
        Missing,
    }

    let location = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => InfoLocation::Indirect(*id),
        Ok(Object::Dictionary(_)) => InfoLocation::Direct,
        _ => InfoLocation::Missing,
    };

    let info = match location {
        InfoLocation::Indirect(id) => doc.get_object_mut(id).and_then(|o| o.as_dict_mut()),
        InfoLocation::Direct => doc.trailer.get_mut(b"Info").and_then(|o| o.as_dict_mut()),
        InfoLocation::Missing => {
            let id = doc.add_object(dictionary! {});
            doc.trailer.set("Info", id);
            doc.get_object_mut(id).and_then(|o| o.as_dict_mut())
        }
    }
    .map_err(|e| Error::Annotation(format!("Info dictionary unavailable: {}", e)))?;

    info.set(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn blank_doc(pages: usize) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn entry() -> BibTexEntry {
        let mut entry = BibTexEntry::new("article", "Doe2021");
        entry.set("author", "Jane Doe");
        entry.set("title", "Hidden Notes");
        entry
    }

    #[test]
    fn test_attach_creates_hidden_annotation() {
        let mut doc = blank_doc(2);
        let when = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let bibtex = to_bibtex(&entry()).unwrap();
        let id = attach_bibtex(&mut doc, "paper.pdf", &bibtex, when).unwrap();

        let annot = doc.get_dictionary(id).unwrap();
        assert_eq!(annot.get(b"Subtype").unwrap().as_name().unwrap(), b"Text");
        assert_eq!(annot.get(b"F").unwrap().as_i64().unwrap(), 34);
        assert_eq!(dict_string(annot, b"T").as_deref(), Some("paper.pdf"));
        assert_eq!(
            dict_string(annot, b"M").as_deref(),
            Some("D:20240229120000Z")
        );

        let first_page = *doc.get_pages().get(&1).unwrap();
        assert_eq!(page_annotations(&doc, first_page).len(), 1);
        let second_page = *doc.get_pages().get(&2).unwrap();
        assert!(page_annotations(&doc, second_page).is_empty());
    }

    #[test]
    fn test_repeated_attach_replaces_own_annotation_only() {
        let mut doc = blank_doc(1);
        let page_id = *doc.get_pages().get(&1).unwrap();
        let foreign = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        });
        doc.get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .unwrap()
            .set("Annots", vec![Object::Reference(foreign)]);

        let now = Utc::now();
        let first = attach_bibtex(&mut doc, "a", "@misc{a,\n}\n", now).unwrap();
        let second = attach_bibtex(&mut doc, "a", "@misc{b,\n}\n", now).unwrap();

        let annots = page_annotations(&doc, page_id);
        assert_eq!(annots.len(), 2);
        assert!(annots.contains(&Object::Reference(foreign)));
        assert!(annots.contains(&Object::Reference(second)));
        assert!(doc.get_object(first).is_err());
    }

    #[test]
    fn test_attach_mirrors_into_info() {
        let mut doc = blank_doc(1);
        attach_bibtex(&mut doc, "n", "@misc{k,\n}\n", Utc::now()).unwrap();
        let backend = LopdfBackend::from_document(doc);
        assert_eq!(read_info_bibtex(&backend).unwrap().key, "k");
    }

    #[test]
    fn test_attach_without_pages_fails() {
        let mut doc = blank_doc(0);
        let result = attach_bibtex(&mut doc, "n", "@misc{k,\n}\n", Utc::now());
        assert!(matches!(result, Err(Error::Annotation(_))));
    }

    #[test]
    fn test_write_and_read_back() {
        let mut backend = LopdfBackend::from_document(blank_doc(1));
        let bytes = write_bibtex_annotation(&mut backend, "Jané.pdf", &entry()).unwrap();

        let reopened = LopdfBackend::load_bytes(&bytes).unwrap();
        let found = read_bibtex_annotations(&reopened);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].page, 1);
        assert_eq!(found[0].display_name.as_deref(), Some("Jané.pdf"));
        assert_eq!(found[0].entry, entry());
        assert!(found[0].modified.is_some());
    }
}
