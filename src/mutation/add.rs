use tracing::{debug, info};

use super::{format_entry, insert_record, BUILD_FILE_SECTION, FILE_REFERENCE_SECTION};
use crate::document::{graph, locator, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::{comment_text, quote_if_needed, FileKind, ObjectKind, ObjectRecord};

/// A record created by one of the add operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub id: String,
    /// The label lists use when they refer to the record.
    pub comment: String,
}

/// Append a `PBXFileReference` for `path` and return its id.
pub fn add_file_reference(
    doc: &mut ManifestDocument,
    path: &str,
    kind: &FileKind,
) -> Result<NewRecord> {
    let section = locator::section_span(doc.text(), FILE_REFERENCE_SECTION)?;
    let id = doc.allocate_id()?;
    let name = file_name(path);

    let record = format!(
        "{} = {{isa = PBXFileReference; lastKnownFileType = {}; path = {}; sourceTree = \"<group>\"; }};",
        format_entry(&id, name),
        quote_if_needed(&kind.file_type),
        quote_if_needed(path),
    );
    let text = insert_record(doc.text(), section, &record);
    doc.replace_text(text);

    info!(%id, path, "added file reference");
    Ok(NewRecord {
        id,
        comment: name.to_string(),
    })
}

/// Like [`add_file_reference`], but reuse a reference that already has `path`.
///
/// Returns the record and whether it was newly created.
pub fn add_file_reference_idempotent(
    doc: &mut ManifestDocument,
    path: &str,
    kind: &FileKind,
) -> Result<(NewRecord, bool)> {
    if let Some(existing) = find_file_reference(doc, path)? {
        debug!(id = %existing.id, path, "file reference already present");
        let comment = existing
            .comment
            .clone()
            .unwrap_or_else(|| file_name(path).to_string());
        return Ok((
            NewRecord {
                id: existing.id,
                comment,
            },
            false,
        ));
    }
    Ok((add_file_reference(doc, path, kind)?, true))
}

/// Append a `PBXBuildFile` wrapping the file reference `file_id`.
///
/// `phase` only labels the record (`Agent.swift in Sources`).
pub fn add_build_file(
    doc: &mut ManifestDocument,
    file_id: &str,
    file_name: &str,
    phase: &str,
) -> Result<NewRecord> {
    let section = locator::section_span(doc.text(), BUILD_FILE_SECTION)?;
    match doc.record(file_id)? {
        Some(r) if r.kind == ObjectKind::FileReference => {}
        _ => return Err(Error::DanglingReference(file_id.to_string())),
    }

    let id = doc.allocate_id()?;
    let comment = format!("{} in {}", file_name, phase);
    let record = format!(
        "{} = {{isa = PBXBuildFile; fileRef = {}; }};",
        format_entry(&id, &comment),
        format_entry(file_id, file_name),
    );
    let text = insert_record(doc.text(), section, &record);
    doc.replace_text(text);

    info!(%id, file_id, "added build file");
    Ok(NewRecord {
        id,
        comment: comment_text(&comment),
    })
}

/// The file reference whose `path` is exactly `path`.
pub fn find_file_reference(doc: &ManifestDocument, path: &str) -> Result<Option<ObjectRecord>> {
    Ok(graph::records(doc.text())?
        .into_iter()
        .find(|r| r.kind == ObjectKind::FileReference && r.value("path").as_deref() == Some(path)))
}

/// A build file wrapping `file_id`, if one exists.
pub fn find_build_file(doc: &ManifestDocument, file_id: &str) -> Result<Option<ObjectRecord>> {
    Ok(graph::records(doc.text())?
        .into_iter()
        .find(|r| r.kind == ObjectKind::BuildFile && r.value("fileRef").as_deref() == Some(file_id)))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
