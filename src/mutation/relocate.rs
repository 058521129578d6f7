use tracing::info;

use super::splice;
use crate::document::{graph, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::{quote, quote_if_needed, ObjectKind, Relocation};

/// Rewrite `path = <from>;` to `path = <to>;` on exactly one record.
///
/// Only file references and groups are considered, optionally narrowed to
/// children of `relocation.group`. No match is [`Error::PathNotFound`]; more
/// than one is [`Error::Ambiguous`] and nothing is rewritten. The record keeps
/// its id, so every list pointing at it stays valid.
pub fn relocate_path(doc: &mut ManifestDocument, relocation: &Relocation) -> Result<String> {
    let text = doc.text();
    let scope = match &relocation.group {
        Some(group) => Some(
            graph::extract_reference_list(text, group, "children").map_err(|e| match e {
                Error::RecordNotFound { .. } => Error::GroupNotFound(group.clone()),
                other => other,
            })?,
        ),
        None => None,
    };

    let records = graph::records(text)?;
    let matches: Vec<_> = records
        .iter()
        .filter(|r| matches!(r.kind, ObjectKind::FileReference | ObjectKind::Group))
        .filter(|r| r.value("path").as_deref() == Some(relocation.from.as_str()))
        .filter(|r| scope.as_ref().map_or(true, |list| list.contains(&r.id)))
        .collect();

    let record = match matches.as_slice() {
        [] => return Err(Error::PathNotFound(relocation.from.clone())),
        [record] => *record,
        many => {
            return Err(Error::Ambiguous {
                what: format!("path {}", relocation.from),
                count: many.len(),
            })
        }
    };

    let Some(field) = record.field("path") else {
        return Err(Error::PathNotFound(relocation.from.clone()));
    };
    let value = if field.is_quoted() {
        quote(&relocation.to)
    } else {
        quote_if_needed(&relocation.to)
    };
    let id = record.id.clone();
    let updated = splice(text, vec![(field.value_span, value)]);
    doc.replace_text(updated);

    info!(%id, from = %relocation.from, to = %relocation.to, "relocated path");
    Ok(id)
}
