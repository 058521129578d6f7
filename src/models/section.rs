use serde::Serialize;

use super::{ObjectRecord, Span};

/// A named `Begin`/`End` delimited region of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    /// Strictly between the begin and end markers.
    pub span: Span,
    pub records: Vec<ObjectRecord>,
}

impl Section {
    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
