//! Session state machine.
//!
//! A session is a plain value. Each event consumes the current state and
//! yields the next one plus whatever the transition produced:
//!
//! ```text
//! NoDocument --load--> DocumentLoaded --submit--> DocumentLoaded
//!      ^                     |    \
//!      +------reset----------+     load (replaces)
//! any state --load fails--> Failed --reset--> NoDocument
//! ```

use crate::annotate::write_bibtex_annotation;
use crate::config::Config;
use crate::error::Error;
use crate::model::{BibTexEntry, DeclaredMetadata, ExtractedText, PdfInfo};
use crate::parser::{LopdfBackend, PdfParser};

/// The single active document of a session.
#[derive(Debug)]
pub struct LoadedFile {
    /// Name of the uploaded file
    pub name: String,
    /// Document handle, mutated by submits
    pub document: LopdfBackend,
    /// Record derived at load time
    pub info: PdfInfo,
    /// Info-dictionary values as declared
    pub declared: DeclaredMetadata,
    /// Extracted text
    pub text: ExtractedText,
    /// Number of successful submits
    pub submits: u32,
}

/// Session state.
#[derive(Debug, Default)]
pub enum Session {
    /// Nothing loaded
    #[default]
    NoDocument,
    /// A document is loaded and editable
    DocumentLoaded(LoadedFile),
    /// The last load failed; `error` is shown to the user
    Failed { name: String, error: String },
}

/// Events driving the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A file was dropped in
    Load { name: String, bytes: Vec<u8> },
    /// The user confirmed the BibTeX form
    Submit(BibTexEntry),
    /// Discard the current document
    Reset,
}

/// What a transition produced besides the next state.
#[derive(Debug)]
pub enum Output {
    /// Nothing to hand back
    None,
    /// Modified document bytes after a submit
    Saved(Vec<u8>),
    /// The submit failed; the document stays loaded
    SubmitFailed(Error),
    /// The event does not apply to the current state
    Ignored,
}

/// Result of applying an event.
#[derive(Debug)]
pub struct Transition {
    pub session: Session,
    pub output: Output,
}

impl Transition {
    fn to(session: Session, output: Output) -> Self {
        Self { session, output }
    }
}

impl Session {
    /// A fresh session with no document.
    pub fn new() -> Self {
        Self::NoDocument
    }

    /// Apply an event.
    pub fn reduce(self, event: SessionEvent, config: &Config) -> Transition {
        match event {
            SessionEvent::Load { name, bytes } => self.load(name, &bytes, config),
            SessionEvent::Submit(entry) => self.submit(&entry, config),
            SessionEvent::Reset => self.reset(),
        }
    }

    /// Load a new document, replacing whatever was active.
    pub fn load(self, name: impl Into<String>, bytes: &[u8], config: &Config) -> Transition {
        let name = name.into();
        drop(self);

        match load_file(&name, bytes, config) {
            Ok(file) => {
                log::debug!("Loaded {} ({} pages)", file.name, file.info.pages);
                Transition::to(Session::DocumentLoaded(file), Output::None)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", name, e);
                Transition::to(
                    Session::Failed {
                        name,
                        error: e.to_string(),
                    },
                    Output::None,
                )
            }
        }
    }

    /// Write `entry` into the loaded document.
    pub fn submit(self, entry: &BibTexEntry, config: &Config) -> Transition {
        let mut file = match self {
            Session::DocumentLoaded(file) => file,
            other => {
                log::warn!("Submit ignored: no document loaded");
                return Transition::to(other, Output::Ignored);
            }
        };

        let display_name = config.display_name.as_deref().unwrap_or(&file.name).to_string();
        let output = match write_bibtex_annotation(&mut file.document, &display_name, entry) {
            Ok(bytes) => {
                file.submits += 1;
                Output::Saved(bytes)
            }
            Err(e) => {
                log::warn!("Failed to write annotation to {}: {}", file.name, e);
                Output::SubmitFailed(e)
            }
        };
        Transition::to(Session::DocumentLoaded(file), output)
    }

    /// Discard the current document.
    pub fn reset(self) -> Transition {
        Transition::to(Session::NoDocument, Output::None)
    }

    /// The loaded file, if any.
    pub fn file(&self) -> Option<&LoadedFile> {
        match self {
            Session::DocumentLoaded(file) => Some(file),
            _ => None,
        }
    }

    /// The derived record, if a document is loaded.
    pub fn info(&self) -> Option<&PdfInfo> {
        self.file().map(|f| &f.info)
    }

    /// A fresh form prefilled from the loaded document.
    pub fn form(&self) -> Option<BibTexEntry> {
        self.info().map(BibTexEntry::from_info)
    }

    /// Title shown in the header: the file name, or the application name.
    pub fn header(&self) -> &str {
        match self {
            Session::DocumentLoaded(file) => &file.name,
            Session::Failed { name, .. } => name,
            Session::NoDocument => "Enhanced Preprint Generator",
        }
    }

    /// Error message of a failed load.
    pub fn error(&self) -> Option<&str> {
        match self {
            Session::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Session::DocumentLoaded(_))
    }
}

fn load_file(name: &str, bytes: &[u8], config: &Config) -> crate::Result<LoadedFile> {
    let parser = PdfParser::from_upload(name, bytes, config.parse_options())?;
    let parsed = parser.parse(name)?;
    Ok(LoadedFile {
        name: name.to_string(),
        document: parser.into_backend(),
        info: parsed.info,
        declared: parsed.declared,
        text: parsed.text,
        submits: 0,
    })
}
