//! Synthetic PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Builder for small single-font PDFs with an optional Info dictionary.
#[derive(Default)]
pub struct TestPdf {
    title: Option<String>,
    author: Option<String>,
    created: Option<String>,
    pages: Vec<String>,
}

impl TestPdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// PDF date string, e.g. `D:20210315120000Z`.
    pub fn created(mut self, date: &str) -> Self {
        self.created = Some(date.to_string());
        self
    }

    /// Add a page showing `text` on a single line.
    pub fn page(mut self, text: &str) -> Self {
        self.pages.push(text.to_string());
        self
    }

    pub fn document(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in &self.pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("failed to encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = lopdf::Dictionary::new();
        if let Some(ref title) = self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        if let Some(ref author) = self.author {
            info.set("Author", Object::string_literal(author.as_str()));
        }
        if let Some(ref created) = self.created {
            info.set("CreationDate", Object::string_literal(created.as_str()));
        }
        if info.len() > 0 {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        doc
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = self.document();
        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

/// A two-page paper about graph coloring by "Jane Q. Doe", dated 2021.
pub fn sample_paper() -> Vec<u8> {
    TestPdf::new()
        .title("Graph Coloring Heuristics")
        .author("Jane Q. Doe")
        .created("D:20210315120000Z")
        .page("Graph coloring heuristics for sparse graph instances")
        .page("We evaluate greedy coloring on sparse graph benchmarks")
        .build()
}

/// A one-page document with no Info dictionary.
pub fn untitled_draft() -> Vec<u8> {
    TestPdf::new()
        .page("Draft notes about compiler scheduling and scheduling passes")
        .build()
}
