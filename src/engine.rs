//! Applying a [`ChangeSet`] to a manifest.
//!
//! Each requested change is one operation with its own outcome. Lookup
//! failures are recorded and the next operation runs against the unchanged
//! text; fatal errors stop the run before anything is written.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::document::{writer, DocumentWriter, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::*;
use crate::mutation::{self, NewRecord};

const DEFAULT_PHASE: &str = "Sources";

/// Apply every change in `changes` to `doc`, in change-set order.
pub fn apply(doc: &mut ManifestDocument, changes: &ChangeSet) -> Result<Vec<OperationOutcome>> {
    let mut outcomes = Vec::with_capacity(changes.len());

    for addition in &changes.add {
        let operation = format!("add {}", addition.path);
        let result = doc.transaction(|doc| add_file(doc, addition));
        outcomes.push(settle(operation, result)?);
    }

    for relocation in &changes.relocate {
        let operation = format!("relocate {} -> {}", relocation.from, relocation.to);
        let result = doc
            .transaction(|doc| mutation::relocate_path(doc, relocation))
            .map(|id| OperationOutcome::applied(operation.clone(), vec![id]));
        outcomes.push(settle(operation, result)?);
    }

    for repoint in &changes.repoint {
        let operation = format!("repoint {} -> {}", repoint.from_url, repoint.to_url);
        let result = doc
            .transaction(|doc| mutation::repoint_package(doc, &repoint.from_url, &repoint.to_url))
            .map(|ids| OperationOutcome::applied(operation.clone(), ids));
        outcomes.push(settle(operation, result)?);
    }

    for product in &changes.remove {
        let operation = format!("remove {}", product);
        let result = doc
            .transaction(|doc| mutation::remove_dependency(doc, product))
            .map(|ids| OperationOutcome::applied(operation.clone(), ids));
        outcomes.push(settle(operation, result)?);
    }

    Ok(outcomes)
}

/// Load the manifest at `path`, apply `changes` and write the result back
/// unless `dry_run` is set or nothing changed.
pub fn run(path: &Path, changes: &ChangeSet, dry_run: bool) -> Result<RunReport> {
    let mut doc = ManifestDocument::load(path)?;
    let original = doc.text().to_string();
    info!(path = %path.display(), operations = changes.len(), "loaded manifest");

    let outcomes = apply(&mut doc, changes)?;
    let changed = doc.text() != original;

    let mut written = false;
    if changed {
        if dry_run {
            writer::check_balanced(doc.text())?;
            info!("dry run, manifest left untouched");
        } else {
            DocumentWriter::new(path).write(&doc)?;
            written = true;
        }
    }

    Ok(RunReport {
        manifest: path.to_path_buf(),
        outcomes,
        changed,
        written,
        finished_at: Utc::now(),
    })
}

/// Reference a file, group it and, for compiled kinds, add it to a build phase.
fn add_file(doc: &mut ManifestDocument, addition: &FileAddition) -> Result<OperationOutcome> {
    let operation = format!("add {}", addition.path);
    let kind = match &addition.kind {
        Some(kind) => FileKind::new(kind.as_str()),
        None => FileKind::infer(&addition.path),
    };

    let mut ids = Vec::new();
    let (file, mut changed) = if addition.idempotent {
        mutation::add_file_reference_idempotent(doc, &addition.path, &kind)?
    } else {
        (mutation::add_file_reference(doc, &addition.path, &kind)?, true)
    };
    if changed {
        ids.push(file.id.clone());
    }

    if let Some(group) = &addition.group {
        changed |= mutation::append_to_group(doc, group, &file.id, &file.comment)?;
    }

    if kind.is_compiled() && !addition.no_build {
        let name = addition.phase.as_deref().unwrap_or(DEFAULT_PHASE);
        let phase = match &addition.target {
            Some(target) => PhaseSelector::in_target(name, target.as_str()),
            None => PhaseSelector::named(name),
        };
        // Fail before allocating anything if the phase cannot be found.
        mutation::resolve_phase(doc, &phase)?;

        let existing = if addition.idempotent {
            mutation::find_build_file(doc, &file.id)?.map(|r| NewRecord {
                comment: r.label().to_string(),
                id: r.id,
            })
        } else {
            None
        };
        let build = match existing {
            Some(build) => build,
            None => {
                let build = mutation::add_build_file(doc, &file.id, &file.comment, &phase.name)?;
                ids.push(build.id.clone());
                changed = true;
                build
            }
        };
        changed |= mutation::append_to_build_phase(doc, &phase, &build.id, &build.comment)?;
    }

    Ok(if changed {
        OperationOutcome::applied(operation, ids)
    } else {
        OperationOutcome::unchanged(operation, "already present")
    })
}

/// Turn a recoverable error into an outcome; pass fatal ones through.
fn settle(operation: String, result: Result<OperationOutcome>) -> Result<OperationOutcome> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) if e.is_fatal() => Err(e),
        Err(Error::ReferenceNotFound(what)) => Ok(OperationOutcome::unchanged(
            operation,
            format!("nothing references {}", what),
        )),
        Err(Error::PathNotFound(path)) => {
            warn!(%operation, %path, "path not found, skipping");
            Ok(OperationOutcome::unchanged(
                operation,
                format!("no file reference with path {}", path),
            ))
        }
        Err(e) if e.is_not_found() => {
            warn!(%operation, error = %e, "lookup failed, operation skipped");
            Ok(OperationOutcome::failed(operation, e.to_string()))
        }
        Err(e) => {
            warn!(%operation, error = %e, "operation failed");
            Ok(OperationOutcome::failed(operation, e.to_string()))
        }
    }
}
