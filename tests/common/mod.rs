#![allow(dead_code)]

use pbxsplice::document::{IdAllocator, IdSource, ManifestDocument};
use pbxsplice::models::ObjectKind;

/// A small app target with one Swift package (LaunchAtLogin) and a helper script.
pub const PROJECT: &str = include_str!("project.pbxproj");

/// Two `Foo.swift` references in different groups.
pub const DUPLICATE_PATHS: &str = include_str!("duplicate_paths.pbxproj");

pub const CORE_GROUP: &str = "C10000000000000000000003";
pub const AGENT_REF: &str = "F10000000000000000000002";
pub const STORE_REF: &str = "F10000000000000000000003";
pub const SOURCES_PHASE: &str = "B10000000000000000000002";

/// Hands out `ABC000…001`, `ABC000…002`, … so tests can predict ids.
pub struct SequentialIds(u64);

impl IdSource for SequentialIds {
    fn candidate(&mut self) -> String {
        self.0 += 1;
        format!("ABC{:021X}", self.0)
    }
}

pub fn document(text: &str) -> ManifestDocument {
    ManifestDocument::with_allocator(text, IdAllocator::with_source(SequentialIds(0)))
}

pub fn new_id(n: u64) -> String {
    format!("ABC{:021X}", n)
}

pub fn count_kind(doc: &ManifestDocument, kind: &ObjectKind) -> usize {
    doc.records()
        .expect("Failed to parse records")
        .iter()
        .filter(|r| &r.kind == kind)
        .count()
}

pub fn braces_balanced(text: &str) -> bool {
    text.matches('{').count() == text.matches('}').count()
}
