use tracing::info;

use super::splice;
use crate::document::{graph, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::{quote, quote_if_needed, ObjectKind};

/// Point every remote package reference at `from_url` to `to_url`.
///
/// The `XCRemoteSwiftPackageReference "<Name>"` labels that refer to it are
/// renamed after the new repository. An unknown URL is
/// [`Error::ReferenceNotFound`].
pub fn repoint_package(
    doc: &mut ManifestDocument,
    from_url: &str,
    to_url: &str,
) -> Result<Vec<String>> {
    let text = doc.text();
    let records = graph::records(text)?;
    let packages: Vec<_> = records
        .iter()
        .filter(|r| r.kind == ObjectKind::PackageReference)
        .filter(|r| r.value("repositoryURL").as_deref() == Some(from_url))
        .collect();
    if packages.is_empty() {
        return Err(Error::ReferenceNotFound(from_url.to_string()));
    }

    let mut edits = Vec::new();
    for package in &packages {
        if let Some(field) = package.field("repositoryURL") {
            let value = if field.is_quoted() {
                quote(to_url)
            } else {
                quote_if_needed(to_url)
            };
            edits.push((field.value_span, value));
        }
    }
    let mut updated = splice(text, edits);

    let (old_name, new_name) = (package_name(from_url), package_name(to_url));
    if old_name != new_name {
        updated = updated.replace(&label(old_name), &label(new_name));
    }
    doc.replace_text(updated);

    let ids: Vec<String> = packages.iter().map(|p| p.id.clone()).collect();
    info!(from_url, to_url, count = ids.len(), "repointed package");
    Ok(ids)
}

fn label(name: &str) -> String {
    format!("/* XCRemoteSwiftPackageReference \"{}\" */", name)
}

/// Repository name from its URL: `https://host/owner/Name.git` → `Name`.
pub fn package_name(url: &str) -> &str {
    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last)
}
