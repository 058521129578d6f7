use tracing::{debug, info};

use super::{append_entry, format_entry};
use crate::document::{graph, locator, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::{ObjectKind, ObjectRecord, PhaseSelector};

/// Append `id` to the `children` of the group called `group`.
///
/// Returns `false` when the id is already listed.
pub fn append_to_group(
    doc: &mut ManifestDocument,
    group: &str,
    id: &str,
    comment: &str,
) -> Result<bool> {
    let owner = locator::resolve_owner(doc.text(), group, "children").map_err(|e| match e {
        Error::RecordNotFound { .. } => Error::GroupNotFound(group.to_string()),
        other => other,
    })?;
    let list = graph::reference_list(doc.text(), &owner, "children")
        .ok_or_else(|| Error::GroupNotFound(group.to_string()))?;
    if list.contains(id) {
        debug!(group, id, "already a child");
        return Ok(false);
    }
    match doc.record(id)? {
        Some(r) if matches!(r.kind, ObjectKind::FileReference | ObjectKind::Group) => {}
        _ => return Err(Error::DanglingReference(id.to_string())),
    }

    let text = append_entry(doc.text(), &owner, &list, &format_entry(id, comment));
    doc.replace_text(text);
    info!(group, id, "appended to group");
    Ok(true)
}

/// Append the build file `id` to the `files` of the selected phase.
///
/// Returns `false` when the id is already listed.
pub fn append_to_build_phase(
    doc: &mut ManifestDocument,
    phase: &PhaseSelector,
    id: &str,
    comment: &str,
) -> Result<bool> {
    let owner = resolve_phase(doc, phase)?;
    let list = graph::reference_list(doc.text(), &owner, "files")
        .ok_or_else(|| Error::PhaseNotFound(phase.to_string()))?;
    if list.contains(id) {
        debug!(%phase, id, "already in phase");
        return Ok(false);
    }
    match doc.record(id)? {
        Some(r) if r.kind == ObjectKind::BuildFile => {}
        _ => return Err(Error::DanglingReference(id.to_string())),
    }

    let text = append_entry(doc.text(), &owner, &list, &format_entry(id, comment));
    doc.replace_text(text);
    info!(%phase, id, "appended to build phase");
    Ok(true)
}

/// Find the build phase record a selector points at.
///
/// With a target, the phase is looked up through that target's
/// `buildPhases`, which disambiguates projects where every target has its
/// own `Sources` phase.
pub fn resolve_phase(doc: &ManifestDocument, phase: &PhaseSelector) -> Result<ObjectRecord> {
    let not_found = || Error::PhaseNotFound(phase.to_string());
    let text = doc.text();

    let Some(target) = &phase.target else {
        let owner = locator::resolve_owner(text, &phase.name, "files").map_err(|e| match e {
            Error::RecordNotFound { .. } => not_found(),
            other => other,
        })?;
        return if owner.kind.is_build_phase() {
            Ok(owner)
        } else {
            Err(not_found())
        };
    };

    let target_record =
        locator::resolve_owner(text, target, "buildPhases").map_err(|e| match e {
            Error::RecordNotFound { .. } => not_found(),
            other => other,
        })?;
    let phases = graph::reference_list(text, &target_record, "buildPhases").ok_or_else(not_found)?;
    let ids: Vec<String> = phases
        .find_by_comment(&phase.name)
        .into_iter()
        .map(|e| e.id.clone())
        .collect();
    let id = match ids.as_slice() {
        [] => return Err(not_found()),
        [id] => id,
        many => {
            return Err(Error::Ambiguous {
                what: phase.to_string(),
                count: many.len(),
            })
        }
    };

    match doc.record(id)? {
        Some(r) if r.kind.is_build_phase() => Ok(r),
        _ => Err(not_found()),
    }
}
