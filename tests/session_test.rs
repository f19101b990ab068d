//! Integration tests for the session state machine.

mod common;

use chrono::Utc;
use common::{sample_paper, untitled_draft, TestPdf};
use enprint::{
    read_bibtex_annotations, read_info_bibtex, BibTexEntry, Config, LopdfBackend, Output, Session,
    SessionEvent,
};

fn load(session: Session, name: &str, bytes: Vec<u8>) -> Session {
    session
        .reduce(
            SessionEvent::Load {
                name: name.to_string(),
                bytes,
            },
            &Config::default(),
        )
        .session
}

#[test]
fn test_load_derives_info() {
    let session = load(Session::new(), "graph.pdf", sample_paper());

    assert!(session.is_loaded());
    assert_eq!(session.header(), "graph.pdf");

    let info = session.info().unwrap();
    assert_eq!(info.art_type, "article");
    assert_eq!(info.title, "Graph Coloring Heuristics");
    assert_eq!(info.author.as_deref(), Some("Jane Q. Doe"));
    assert_eq!(info.art_title, "JaneQ.Doe2021");
    assert_eq!(info.pages, 2);
    assert_eq!(info.year(), "2021");
    assert!(info.keywords.len() <= 10);
    assert_eq!(info.keywords.first().map(String::as_str), Some("graph"));
}

#[test]
fn test_load_without_metadata_uses_fallbacks() {
    let before = Utc::now().timestamp();
    let session = load(Session::new(), "untitled_draft.pdf", untitled_draft());
    let after = Utc::now().timestamp();

    let info = session.info().unwrap();
    assert_eq!(info.title, "untitled_draft");
    assert!(info.author.is_none());
    assert!(info.date.timestamp() >= before && info.date.timestamp() <= after);
    assert_eq!(info.art_title, format!("untitled_draft{}", info.year()));
}

#[test]
fn test_blank_title_and_author_count_as_absent() {
    let bytes = TestPdf::new()
        .title("   ")
        .author("")
        .created("D:20190704000000Z")
        .page("Notes on register allocation")
        .build();
    let session = load(Session::new(), "blank_fields.pdf", bytes);

    let info = session.info().unwrap();
    assert_eq!(info.title, "blank_fields");
    assert!(info.author.is_none());
    assert_eq!(info.art_title, "blank_fields2019");
    assert!(session.form().unwrap().get("author").is_none());
}

#[test]
fn test_form_prefill() {
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let form = session.form().unwrap();

    assert_eq!(form.entry_type, "article");
    assert_eq!(form.key, "JaneQ.Doe2021");
    assert_eq!(form.get("author"), Some("Jane Q. Doe"));
    assert_eq!(form.get("numpages"), Some("2"));
    assert_eq!(form.get("year"), Some("2021"));
    assert_eq!(form.get("month"), Some("mar"));
    assert!(form.get("journal").is_none());
}

#[test]
fn test_submit_returns_annotated_bytes() {
    let config = Config::default();
    let session = load(Session::new(), "graph.pdf", sample_paper());

    let mut entry = session.form().unwrap();
    entry.set("journal", "Journal of Graph Algorithms");

    let t = session.reduce(SessionEvent::Submit(entry.clone()), &config);
    let bytes = match t.output {
        Output::Saved(bytes) => bytes,
        other => panic!("unexpected output: {:?}", other),
    };
    assert!(t.session.is_loaded());
    assert_eq!(t.session.file().unwrap().submits, 1);

    let reopened = LopdfBackend::load_bytes(&bytes).unwrap();
    let found = read_bibtex_annotations(&reopened);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].entry, entry);
    assert_eq!(found[0].display_name.as_deref(), Some("graph.pdf"));
}

#[test]
fn test_submit_with_last_first_author_reads_back() {
    let config = Config::default();
    let bytes = TestPdf::new()
        .title("Graph Coloring Heuristics")
        .author("Doe, Jane")
        .created("D:20210315120000Z")
        .page("Graph coloring heuristics")
        .build();
    let session = load(Session::new(), "graph.pdf", bytes);

    let entry = session.form().unwrap();
    assert_eq!(entry.key, "Doe,Jane2021");

    let t = session.reduce(SessionEvent::Submit(entry.clone()), &config);
    let Output::Saved(bytes) = t.output else {
        panic!("submit failed");
    };
    let reopened = LopdfBackend::load_bytes(&bytes).unwrap();

    let found = read_bibtex_annotations(&reopened);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].entry.key, "DoeJane2021");
    assert_eq!(found[0].entry.get("author"), Some("Doe, Jane"));
    let mut expected = entry.clone();
    expected.key = "DoeJane2021".to_string();
    assert_eq!(found[0].entry, expected);

    let mirrored = read_info_bibtex(&reopened).unwrap();
    assert_eq!(mirrored, expected);
}

#[test]
fn test_submit_keeps_unbalanced_braces_and_backslash() {
    let config = Config::default();
    let session = load(Session::new(), "graph.pdf", sample_paper());

    let mut entry = session.form().unwrap();
    entry.set("title", "half { open");
    entry.set("note", "ends with \\");

    let t = session.reduce(SessionEvent::Submit(entry.clone()), &config);
    let Output::Saved(bytes) = t.output else {
        panic!("submit failed");
    };
    let found = read_bibtex_annotations(&LopdfBackend::load_bytes(&bytes).unwrap());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].entry.get("title"), Some("half { open"));
    assert_eq!(found[0].entry.get("note"), Some("ends with \\"));
    assert_eq!(found[0].entry, entry);
}

#[test]
fn test_repeated_submit_keeps_one_annotation() {
    let config = Config::default();
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let entry = session.form().unwrap();

    let t = session.reduce(SessionEvent::Submit(entry.clone()), &config);
    let mut revised = entry.clone();
    revised.set("volume", "7");
    let t = t.session.reduce(SessionEvent::Submit(revised), &config);

    let Output::Saved(bytes) = t.output else {
        panic!("second submit failed");
    };
    let found = read_bibtex_annotations(&LopdfBackend::load_bytes(&bytes).unwrap());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].entry.get("volume"), Some("7"));
    assert_eq!(t.session.file().unwrap().submits, 2);
}

#[test]
fn test_display_name_override() {
    let config = Config::default().with_display_name("Camera-ready");
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let entry = session.form().unwrap();

    let t = session.reduce(SessionEvent::Submit(entry), &config);
    let Output::Saved(bytes) = t.output else {
        panic!("submit failed");
    };
    let found = read_bibtex_annotations(&LopdfBackend::load_bytes(&bytes).unwrap());
    assert_eq!(found[0].display_name.as_deref(), Some("Camera-ready"));
}

#[test]
fn test_load_replaces_previous_document() {
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let session = load(session, "untitled_draft.pdf", untitled_draft());

    assert_eq!(session.header(), "untitled_draft.pdf");
    assert_eq!(session.info().unwrap().pages, 1);
}

#[test]
fn test_corrupt_load_fails_then_recovers() {
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let session = load(session, "broken.pdf", b"%PDF-1.7\ngarbage".to_vec());

    assert!(matches!(session, Session::Failed { .. }));
    assert!(session.info().is_none());
    assert_eq!(session.header(), "broken.pdf");

    let session = load(session, "graph.pdf", sample_paper());
    assert!(session.is_loaded());
}

#[test]
fn test_wrong_extension_fails() {
    let session = load(Session::new(), "graph.txt", sample_paper());
    let message = session.error().unwrap();
    assert!(message.contains("graph.txt"));
}

#[test]
fn test_submit_after_failure_is_ignored() {
    let session = load(Session::new(), "broken.pdf", Vec::new());
    let t = session.reduce(
        SessionEvent::Submit(BibTexEntry::new("article", "k")),
        &Config::default(),
    );
    assert!(matches!(t.output, Output::Ignored));
    assert!(matches!(t.session, Session::Failed { .. }));
}

#[test]
fn test_reset_drops_document() {
    let session = load(Session::new(), "graph.pdf", sample_paper());
    let t = session.reduce(SessionEvent::Reset, &Config::default());

    assert!(matches!(t.session, Session::NoDocument));
    assert!(t.session.form().is_none());
    assert_eq!(t.session.header(), "Enhanced Preprint Generator");
}
