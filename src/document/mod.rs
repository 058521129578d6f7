//! The manifest document and everything needed to read it.
//!
//! - [`scanner`]: lexical helpers (strings and comments are opaque)
//! - [`locator`]: sections, record boundaries, named owners
//! - [`graph`]: parsed views of sections, records and reference lists
//! - [`ids`]: collision-free object ids
//! - [`writer`]: atomic, verified persistence

pub mod graph;
pub mod ids;
pub mod locator;
pub(crate) mod scanner;
pub mod writer;

use std::fs;
use std::path::Path;

pub use ids::{IdAllocator, IdSource, RandomIds};
pub use scanner::{contains_token, mentions};
pub use writer::DocumentWriter;

use crate::error::Result;
use crate::models::{ObjectRecord, ReferenceList, Section};

/// Raw manifest text for one editing session, plus the session's id allocator.
///
/// The text is the only state: every view is re-derived from it on demand, so
/// no offset survives a mutation.
#[derive(Debug)]
pub struct ManifestDocument {
    text: String,
    ids: IdAllocator,
}

impl ManifestDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_allocator(text, IdAllocator::new())
    }

    pub fn with_allocator(text: impl Into<String>, ids: IdAllocator) -> Self {
        Self {
            text: text.into(),
            ids,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn section(&self, name: &str) -> Result<Section> {
        graph::extract_section(&self.text, name)
    }

    pub fn sections(&self) -> Result<Vec<Section>> {
        graph::sections(&self.text)
    }

    pub fn records(&self) -> Result<Vec<ObjectRecord>> {
        graph::records(&self.text)
    }

    pub fn record(&self, id: &str) -> Result<Option<ObjectRecord>> {
        graph::find_record(&self.text, id)
    }

    /// The `field` list (`children`, `files`, …) of the record called `owner`.
    pub fn reference_list(&self, owner: &str, field: &str) -> Result<ReferenceList> {
        graph::extract_reference_list(&self.text, owner, field)
    }

    pub fn allocate_id(&mut self) -> Result<String> {
        self.ids.allocate(&self.text)
    }

    pub(crate) fn replace_text(&mut self, text: String) {
        self.text = text;
    }

    /// Run `f`; if it fails, restore the text as it was before.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = self.text.clone();
        let result = f(self);
        if result.is_err() {
            self.text = saved;
        }
        result
    }
}
