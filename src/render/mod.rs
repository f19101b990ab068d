//! Output rendering: BibTeX text and JSON.

mod bibtex;
mod json;

pub use bibtex::{citation_key, to_bibtex};
pub use json::{to_json, JsonFormat};
