//! Finding sections, records and fields in raw manifest text.
//!
//! Every field lookup is scoped to the body of the record that owns it. A
//! search for `children = (` never runs over the document as a whole, because
//! the first match would usually belong to some unrelated sibling group.

use tracing::debug;

use super::graph;
use super::scanner::{contains_token, find_bytes, matching_close, skip_opaque, skip_ws};
use crate::error::{Error, Result};
use crate::models::{ObjectRecord, Span};

pub fn begin_marker(section: &str) -> String {
    format!("/* Begin {} section */", section)
}

pub fn end_marker(section: &str) -> String {
    format!("/* End {} section */", section)
}

/// Text strictly between the first `begin` and the first `end` after it.
pub fn locate(text: &str, begin: &str, end: &str) -> Option<Span> {
    let start = text.find(begin)? + begin.len();
    let stop = text[start..].find(end)? + start;
    Some(Span::new(start, stop))
}

/// Span of the section called `name`.
pub fn section_span(text: &str, name: &str) -> Result<Span> {
    locate(text, &begin_marker(name), &end_marker(name))
        .ok_or_else(|| Error::SectionMissing(name.to_string()))
}

/// Boundaries of one `<id> /* <comment> */ = { … };` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordBounds {
    pub id: Span,
    pub comment: Option<Span>,
    /// Between the record's own braces.
    pub body: Span,
    /// From the id through the terminating `;`.
    pub span: Span,
}

/// Resolve the record whose header starts at `at`, without reading past `limit`.
pub fn record_bounds(text: &str, at: usize, limit: usize) -> Result<RecordBounds> {
    let bytes = text.as_bytes();

    let id_end = if bytes.get(at) == Some(&b'"') {
        skip_opaque(bytes, at).unwrap_or(limit).min(limit)
    } else {
        let mut i = at;
        while i < limit && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/'
        {
            i += 1;
        }
        i
    };
    if id_end == at {
        return Err(Error::malformed(at, "expected record id"));
    }

    let mut i = skip_ws(bytes, id_end, limit);
    let mut comment = None;
    if bytes[i..limit].starts_with(b"/*") {
        let close = find_bytes(bytes, i + 2, b"*/")
            .filter(|&c| c < limit)
            .ok_or_else(|| Error::malformed(i, "unterminated comment"))?;
        comment = Some(trimmed(text, Span::new(i + 2, close)));
        i = skip_ws(bytes, close + 2, limit);
    }

    if bytes.get(i) != Some(&b'=') || i >= limit {
        return Err(Error::malformed(i, "expected `=` after record id"));
    }
    i = skip_ws(bytes, i + 1, limit);
    if bytes.get(i) != Some(&b'{') || i >= limit {
        return Err(Error::malformed(i, "expected `{` opening record body"));
    }
    let close = matching_close(bytes, i)
        .filter(|&c| c < limit)
        .ok_or_else(|| Error::malformed(i, "unbalanced record body"))?;
    let semi = skip_ws(bytes, close + 1, limit);
    if bytes.get(semi) != Some(&b';') || semi >= limit {
        return Err(Error::malformed(semi, "expected `;` after record body"));
    }

    Ok(RecordBounds {
        id: Span::new(at, id_end),
        comment,
        body: Span::new(i + 1, close),
        span: Span::new(at, semi + 1),
    })
}

fn trimmed(text: &str, span: Span) -> Span {
    let slice = span.slice(text);
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    Span::new(span.start + lead, span.end - trail)
}

/// Find the record called `name` that owns a list field `field`.
///
/// Candidates are records whose comment equals `name`, then records whose
/// `name` or `path` equals it, then records whose comment contains `name` as a
/// distinct token. The first tier with any candidate wins; more than one
/// candidate in that tier is [`Error::Ambiguous`].
pub fn resolve_owner(text: &str, name: &str, field: &str) -> Result<ObjectRecord> {
    let records = graph::records(text)?;
    let ranked: Vec<(u8, &ObjectRecord)> = records
        .iter()
        .filter(|r| r.field(field).is_some_and(|f| f.is_list()))
        .filter_map(|r| name_rank(r, name).map(|rank| (rank, r)))
        .collect();

    let Some(best) = ranked.iter().map(|(rank, _)| *rank).min() else {
        return Err(Error::RecordNotFound {
            name: name.to_string(),
            field: field.to_string(),
        });
    };
    let mut matches = ranked.into_iter().filter(|(rank, _)| *rank == best);
    match (matches.next(), matches.count()) {
        (Some((_, owner)), 0) => {
            debug!(name, field, id = %owner.id, "resolved owning record");
            Ok(owner.clone())
        }
        (_, rest) => Err(Error::Ambiguous {
            what: format!("{} ({})", name, field),
            count: rest + 1,
        }),
    }
}

fn name_rank(record: &ObjectRecord, name: &str) -> Option<u8> {
    if record.comment.as_deref() == Some(name) {
        Some(0)
    } else if record.value("name").as_deref() == Some(name)
        || record.value("path").as_deref() == Some(name)
    {
        Some(1)
    } else if record
        .comment
        .as_deref()
        .is_some_and(|c| contains_token(c, name))
    {
        Some(2)
    } else {
        None
    }
}

/// Interior of `field = ( … )` inside the record called `name`.
pub fn locate_named(text: &str, name: &str, field: &str) -> Result<Span> {
    let owner = resolve_owner(text, name, field)?;
    list_interior(&owner, field).ok_or_else(|| Error::RecordNotFound {
        name: name.to_string(),
        field: field.to_string(),
    })
}

/// Interior of a list field of an already-resolved record.
pub fn list_interior(record: &ObjectRecord, field: &str) -> Option<Span> {
    let f = record.field(field).filter(|f| f.is_list())?;
    Some(Span::new(f.value_span.start + 1, f.value_span.end - 1))
}
