use serde::Serialize;

use super::Span;

/// One `<id> /* <comment> */,` item of a [`ReferenceList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefEntry {
    pub id: String,
    pub comment: Option<String>,
    /// From the id through the end of the comment, excluding the comma.
    pub span: Span,
    /// Offset of the separating comma, when the entry has one.
    pub comma: Option<usize>,
}

impl RefEntry {
    /// End of the entry including its comma.
    pub fn end(&self) -> usize {
        self.comma.map(|c| c + 1).unwrap_or(self.span.end)
    }
}

/// An ordered list of ids held in a record field such as `children` or `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceList {
    pub owner_id: String,
    pub field: String,
    /// Between the list's `(` and `)`.
    pub span: Span,
    pub entries: Vec<RefEntry>,
}

impl ReferenceList {
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn find_by_comment(&self, comment: &str) -> Vec<&RefEntry> {
        self.entries
            .iter()
            .filter(|e| e.comment.as_deref() == Some(comment))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
