//! Structured, read-only views over the manifest text.
//!
//! Nothing here mutates the document; every view carries byte spans so the
//! mutations can splice the original text.

use super::locator::{self, record_bounds};
use super::scanner::{find_bytes, skip_opaque, skip_ws, statement_end};
use crate::error::{Error, Result};
use crate::models::{
    literal_value, Field, ObjectKind, ObjectRecord, RefEntry, ReferenceList, Section, Span,
};

const BEGIN: &str = "/* Begin ";
const SECTION_SUFFIX: &str = " section */";

/// Every section of the document, in order.
pub fn sections(text: &str) -> Result<Vec<Section>> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(pos) = text[from..].find(BEGIN) {
        let name_start = from + pos + BEGIN.len();
        let Some(name_len) = text[name_start..].find(SECTION_SUFFIX) else {
            break;
        };
        let name = &text[name_start..name_start + name_len];
        let start = name_start + name_len + SECTION_SUFFIX.len();
        let end_marker = locator::end_marker(name);
        let end = text[start..]
            .find(&end_marker)
            .map(|p| p + start)
            .ok_or_else(|| Error::malformed(start, format!("section `{}` never ends", name)))?;

        let span = Span::new(start, end);
        out.push(Section {
            name: name.to_string(),
            span,
            records: parse_records(text, span, name)?,
        });
        from = end + end_marker.len();
    }
    Ok(out)
}

/// The section called `name`, parsed into records.
pub fn extract_section(text: &str, name: &str) -> Result<Section> {
    let span = locator::section_span(text, name)?;
    Ok(Section {
        name: name.to_string(),
        span,
        records: parse_records(text, span, name)?,
    })
}

/// Every record of every section, in document order.
pub fn records(text: &str) -> Result<Vec<ObjectRecord>> {
    Ok(sections(text)?
        .into_iter()
        .flat_map(|s| s.records)
        .collect())
}

pub fn find_record(text: &str, id: &str) -> Result<Option<ObjectRecord>> {
    Ok(records(text)?.into_iter().find(|r| r.id == id))
}

/// The `field` list of the record called `owner`.
pub fn extract_reference_list(text: &str, owner: &str, field: &str) -> Result<ReferenceList> {
    let record = locator::resolve_owner(text, owner, field)?;
    reference_list(text, &record, field).ok_or_else(|| Error::RecordNotFound {
        name: owner.to_string(),
        field: field.to_string(),
    })
}

/// The `field` list of `record`, if it has one.
pub fn reference_list(text: &str, record: &ObjectRecord, field: &str) -> Option<ReferenceList> {
    let span = locator::list_interior(record, field)?;
    Some(parse_list(text, &record.id, field, span))
}

/// Every top-level list field of every record.
pub fn all_reference_lists(text: &str) -> Result<Vec<ReferenceList>> {
    let mut lists = Vec::new();
    for record in records(text)? {
        for field in record.fields.iter().filter(|f| f.is_list()) {
            if let Some(list) = reference_list(text, &record, &field.key) {
                lists.push(list);
            }
        }
    }
    Ok(lists)
}

/// Fields of a nested `{ … }` value such as `buildSettings`.
pub fn dictionary(text: &str, field: &Field) -> Result<Option<Vec<Field>>> {
    if !field.raw.starts_with('{') {
        return Ok(None);
    }
    let body = Span::new(field.value_span.start + 1, field.value_span.end - 1);
    parse_fields(text, body).map(Some)
}

/// Entries of a list-valued field, including fields nested in dictionaries.
pub fn field_list(text: &str, owner_id: &str, field: &Field) -> Option<ReferenceList> {
    field.is_list().then(|| {
        let span = Span::new(field.value_span.start + 1, field.value_span.end - 1);
        parse_list(text, owner_id, &field.key, span)
    })
}

fn parse_records(text: &str, span: Span, section: &str) -> Result<Vec<ObjectRecord>> {
    let bytes = text.as_bytes();
    let mut records = Vec::new();
    let mut i = span.start;
    loop {
        i = skip_ws(bytes, i, span.end);
        if i >= span.end {
            break;
        }
        if bytes[i..span.end].starts_with(b"/*") || bytes[i..span.end].starts_with(b"//") {
            i = skip_opaque(bytes, i).unwrap_or(span.end);
            continue;
        }

        let bounds = record_bounds(text, i, span.end)?;
        let fields = parse_fields(text, bounds.body)?;
        let kind = fields
            .iter()
            .find(|f| f.key == "isa")
            .map(|f| ObjectKind::from_isa(&f.literal()))
            .unwrap_or_else(|| ObjectKind::Other(String::new()));

        records.push(ObjectRecord {
            id: literal_value(bounds.id.slice(text)),
            comment: bounds.comment.map(|c| c.slice(text).to_string()),
            kind,
            fields,
            span: bounds.span,
            body: bounds.body,
            section: section.to_string(),
        });
        i = bounds.span.end;
    }
    Ok(records)
}

fn parse_fields(text: &str, body: Span) -> Result<Vec<Field>> {
    let bytes = text.as_bytes();
    let mut fields = Vec::new();
    let mut i = body.start;
    loop {
        i = skip_ws(bytes, i, body.end);
        if i >= body.end {
            break;
        }
        if bytes[i..body.end].starts_with(b"/*") {
            i = skip_opaque(bytes, i).unwrap_or(body.end);
            continue;
        }

        let key_start = i;
        let key_end = if bytes[i] == b'"' {
            skip_opaque(bytes, i).unwrap_or(body.end)
        } else {
            while i < body.end && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
                i += 1;
            }
            i
        };
        let eq = skip_ws(bytes, key_end, body.end);
        if bytes.get(eq) != Some(&b'=') || eq >= body.end {
            return Err(Error::malformed(eq, "expected `=` after field name"));
        }

        let value_start = skip_ws(bytes, eq + 1, body.end);
        let semi = statement_end(bytes, value_start, body.end)
            .ok_or_else(|| Error::malformed(value_start, "unterminated field value"))?;
        let raw = text[value_start..semi].trim_end();

        fields.push(Field {
            key: literal_value(&text[key_start..key_end]),
            raw: raw.to_string(),
            key_span: Span::new(key_start, key_end),
            value_span: Span::new(value_start, value_start + raw.len()),
        });
        i = semi + 1;
    }
    Ok(fields)
}

fn parse_list(text: &str, owner_id: &str, field: &str, span: Span) -> ReferenceList {
    let bytes = text.as_bytes();
    let mut entries = Vec::new();
    let mut i = span.start;
    loop {
        i = skip_ws(bytes, i, span.end);
        if i >= span.end {
            break;
        }
        if bytes[i] == b',' {
            i += 1;
            continue;
        }

        let token_start = i;
        let token_end = if bytes[i] == b'"' {
            skip_opaque(bytes, i).unwrap_or(span.end).min(span.end)
        } else {
            let mut j = i;
            while j < span.end
                && !bytes[j].is_ascii_whitespace()
                && bytes[j] != b','
                && !bytes[j..span.end].starts_with(b"/*")
            {
                j += 1;
            }
            j
        };
        if token_end == token_start {
            // A comment with no id in front of it.
            i = skip_opaque(bytes, i).unwrap_or(i + 1);
            continue;
        }

        let mut j = skip_ws(bytes, token_end, span.end);
        let mut entry_end = token_end;
        let mut comment = None;
        if bytes[j..span.end].starts_with(b"/*") {
            if let Some(close) = find_bytes(bytes, j + 2, b"*/").filter(|&c| c < span.end) {
                comment = Some(text[j + 2..close].trim().to_string());
                entry_end = close + 2;
                j = skip_ws(bytes, entry_end, span.end);
            }
        }

        let comma = (j < span.end && bytes[j] == b',').then_some(j);
        entries.push(RefEntry {
            id: literal_value(&text[token_start..token_end]),
            comment,
            span: Span::new(token_start, entry_end),
            comma,
        });
        i = comma.map(|c| c + 1).unwrap_or(j);
    }

    ReferenceList {
        owner_id: owner_id.to_string(),
        field: field.to_string(),
        span,
        entries,
    }
}
