use std::collections::BTreeSet;

use tracing::{debug, info};

use super::{line_span, splice};
use crate::document::scanner::{skip_opaque, skip_ws};
use crate::document::{graph, mentions, ManifestDocument};
use crate::error::{Error, Result};
use crate::models::{ObjectKind, ObjectRecord, Span};

/// Remove the package product `product` and everything that points at it.
///
/// That covers the product record, the build files wrapping it, the package
/// reference (unless another product still uses it), shell-script phases
/// that mention the product, any record whose scalar fields point at a
/// removed id, every reference-list entry for the removed ids, and build
/// settings that name the product. Returns the removed ids; a product that
/// is already gone is
/// [`Error::ReferenceNotFound`], which callers treat as a no-op.
pub fn remove_dependency(doc: &mut ManifestDocument, product: &str) -> Result<Vec<String>> {
    let text = doc.text();
    let records = graph::records(text)?;

    let products: Vec<&ObjectRecord> = records
        .iter()
        .filter(|r| r.kind == ObjectKind::PackageProductReference)
        .filter(|r| match r.value("productName") {
            Some(name) => name == product,
            None => r.comment.as_deref() == Some(product),
        })
        .collect();

    let mut removed: BTreeSet<String> = products.iter().map(|r| r.id.clone()).collect();

    for package in products.iter().filter_map(|p| p.value("package")) {
        let shared = records.iter().any(|r| {
            r.kind == ObjectKind::PackageProductReference
                && !removed.contains(&r.id)
                && r.value("package").as_deref() == Some(package.as_str())
        });
        if shared {
            debug!(package = %package, "package still used by another product");
        } else {
            removed.insert(package);
        }
    }

    for script in records.iter().filter(|r| r.kind.is_shell_script()) {
        if script
            .field("shellScript")
            .is_some_and(|f| mentions(&f.literal(), product))
        {
            removed.insert(script.id.clone());
        }
    }

    cascade(&records, &mut removed);
    let settings = settings_edits(text, &records, &removed, product)?;
    if removed.is_empty() && settings.is_empty() {
        return Err(Error::ReferenceNotFound(product.to_string()));
    }

    let mut edits: Vec<(Span, String)> = records
        .iter()
        .filter(|r| removed.contains(&r.id))
        .map(|r| (line_span(text, r.span), String::new()))
        .collect();
    edits.extend(settings);
    for list in graph::all_reference_lists(text)? {
        if removed.contains(&list.owner_id) {
            continue;
        }
        for entry in list.entries.iter().filter(|e| removed.contains(&e.id)) {
            let span = Span::new(entry.span.start, entry.end());
            edits.push((line_span(text, span), String::new()));
        }
    }

    let updated = tidy(&splice(text, edits));
    if let Some(dangling) = removed.iter().find(|id| updated.contains(id.as_str())) {
        return Err(Error::DanglingReference(dangling.clone()));
    }
    doc.replace_text(updated);

    let ids: Vec<String> = removed.into_iter().collect();
    info!(product, removed = ids.len(), "removed dependency");
    Ok(ids)
}

/// Grow `removed` with every record whose scalar fields point at a removed id.
fn cascade(records: &[ObjectRecord], removed: &mut BTreeSet<String>) {
    loop {
        let hits: Vec<String> = records
            .iter()
            .filter(|r| !removed.contains(&r.id))
            .filter(|r| {
                r.fields
                    .iter()
                    .filter(|f| f.key != "isa" && !f.is_list() && !f.raw.starts_with('{'))
                    .any(|f| removed.contains(&f.literal()))
            })
            .map(|r| r.id.clone())
            .collect();
        if hits.is_empty() {
            break;
        }
        removed.extend(hits);
    }
}

/// Edits dropping the build-setting fragments that name `product`.
///
/// List settings lose the matching items, together with a `-framework` or
/// `-weak_framework` flag right before them. Scalar settings whose value
/// names the product are removed whole.
fn settings_edits(
    text: &str,
    records: &[ObjectRecord],
    removed: &BTreeSet<String>,
    product: &str,
) -> Result<Vec<(Span, String)>> {
    let bytes = text.as_bytes();
    let mut edits = Vec::new();
    let configs = records
        .iter()
        .filter(|r| r.kind == ObjectKind::BuildConfiguration && !removed.contains(&r.id));
    for config in configs {
        let Some(field) = config.field("buildSettings") else {
            continue;
        };
        let Some(settings) = graph::dictionary(text, field)? else {
            continue;
        };

        for setting in &settings {
            if let Some(list) = graph::field_list(text, &config.id, setting) {
                for (i, entry) in list.entries.iter().enumerate() {
                    if !mentions(&entry.id, product) {
                        continue;
                    }
                    let flag = i.checked_sub(1).map(|p| &list.entries[p]).filter(|flag| {
                        matches!(flag.id.as_str(), "-framework" | "-weak_framework")
                    });
                    for item in flag.into_iter().chain([entry]) {
                        let span = Span::new(item.span.start, item.end());
                        edits.push((line_span(text, span), String::new()));
                    }
                }
            } else if !setting.raw.starts_with('{') && mentions(&setting.literal(), product) {
                let after = skip_ws(bytes, setting.value_span.end, bytes.len());
                let end = if bytes.get(after) == Some(&b';') {
                    after + 1
                } else {
                    setting.value_span.end
                };
                let span = Span::new(setting.key_span.start, end);
                edits.push((line_span(text, span), String::new()));
            }
        }
    }
    Ok(edits)
}

/// Drop commas left without an entry and collapse runs of blank lines.
pub(crate) fn tidy(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut orphans = Vec::new();
    let mut last = None;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(next) = skip_opaque(bytes, i) {
            last = Some(b'"');
            i = next;
            continue;
        }
        let b = bytes[i];
        if b == b',' && matches!(last, Some(b'(') | Some(b',')) {
            orphans.push((line_span(text, Span::new(i, i + 1)), String::new()));
        } else if !b.is_ascii_whitespace() {
            last = Some(b);
        }
        i += 1;
    }
    let text = splice(text, orphans);

    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_drops_orphan_commas() {
        let text = "files = (\n\t,\n\tA /* a */,\n);\nother = (B, , C);";
        assert_eq!(
            tidy(text),
            "files = (\n\tA /* a */,\n);\nother = (B,  C);"
        );
    }

    #[test]
    fn test_tidy_keeps_trailing_commas() {
        let text = "files = (\n\tA /* a */,\n\tB /* b */,\n);";
        assert_eq!(tidy(text), text);
    }

    #[test]
    fn test_tidy_collapses_blank_runs() {
        assert_eq!(tidy("a;\n\n\n\nb;\n\nc;"), "a;\n\nb;\n\nc;");
    }

    #[test]
    fn test_tidy_ignores_commas_in_strings() {
        let text = "x = \"(,\";";
        assert_eq!(tidy(text), text);
    }
}
