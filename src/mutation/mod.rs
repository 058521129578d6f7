//! Text-level edits of a [`ManifestDocument`](crate::document::ManifestDocument).
//!
//! Every operation re-locates what it needs from the current text, builds the
//! new text in one pass and swaps it in. Offsets are never carried from one
//! operation to the next.

mod add;
mod append;
mod relocate;
mod remove;
mod repoint;

pub use add::*;
pub use append::*;
pub use relocate::*;
pub use remove::*;
pub use repoint::*;

use crate::document::scanner::{indentation, line_end, line_start, owns_lines};
use crate::models::{comment_text, ObjectRecord, ReferenceList, Span};

pub const FILE_REFERENCE_SECTION: &str = "PBXFileReference";
pub const BUILD_FILE_SECTION: &str = "PBXBuildFile";

/// `<id> /* <comment> */` as written in reference lists.
pub fn format_entry(id: &str, comment: &str) -> String {
    format!("{} /* {} */", id, comment_text(comment))
}

/// Replace each span with its text. Overlapping spans are merged, the first
/// replacement winning.
pub(crate) fn splice(text: &str, mut edits: Vec<(Span, String)>) -> String {
    edits.sort_by_key(|(span, _)| (span.start, span.end));
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        if span.start < cursor {
            if span.end > cursor {
                cursor = span.end;
            }
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Widen `span` to whole lines when nothing else shares them.
pub(crate) fn line_span(text: &str, span: Span) -> Span {
    let bytes = text.as_bytes();
    if owns_lines(bytes, span.start, span.end) {
        Span::new(
            line_start(bytes, span.start),
            line_end(bytes, span.end.saturating_sub(1).max(span.start)),
        )
    } else {
        span
    }
}

/// Insert a one-line record just before the end marker of `section`.
pub(crate) fn insert_record(text: &str, section: Span, record: &str) -> String {
    let bytes = text.as_bytes();
    let indent = section_indent(text, section);
    let at = line_start(bytes, section.end);
    if at > section.start && text[at..section.end].trim().is_empty() {
        splice(text, vec![(Span::new(at, at), format!("{}{}\n", indent, record))])
    } else {
        let at = section.end;
        splice(text, vec![(Span::new(at, at), format!("\n{}{}\n", indent, record))])
    }
}

fn section_indent(text: &str, section: Span) -> String {
    section
        .slice(text)
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l[..l.len() - l.trim_start().len()].to_string())
        .unwrap_or_else(|| "\t\t".to_string())
}

/// Add `entry` as the last item of `list`, keeping the existing layout.
pub(crate) fn append_entry(
    text: &str,
    owner: &ObjectRecord,
    list: &ReferenceList,
    entry: &str,
) -> String {
    let bytes = text.as_bytes();
    let field_indent = owner
        .field(&list.field)
        .map(|f| indentation(text, f.key_span.start).to_string())
        .unwrap_or_default();
    let close = list.span.end;
    let close_line = line_start(bytes, close);

    let multiline = close_line > list.span.start && text[close_line..close].trim().is_empty();
    if multiline {
        let indent = list
            .entries
            .last()
            .map(|e| indentation(text, e.span.start).to_string())
            .unwrap_or_else(|| format!("{}\t", field_indent));
        let mut edits = vec![(
            Span::new(close_line, close_line),
            format!("{}{},\n", indent, entry),
        )];
        if let Some(last) = list.entries.last().filter(|e| e.comma.is_none()) {
            edits.push((Span::new(last.span.end, last.span.end), ",".to_string()));
        }
        return splice(text, edits);
    }

    let mut body = String::from("\n");
    for existing in &list.entries {
        body.push_str(&format!("{}\t{},\n", field_indent, existing.span.slice(text)));
    }
    body.push_str(&format!("{}\t{},\n{}", field_indent, entry, field_indent));
    splice(text, vec![(list.span, body)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_applies_in_order() {
        let text = "0123456789";
        let out = splice(
            text,
            vec![
                (Span::new(8, 9), "x".to_string()),
                (Span::new(1, 3), String::new()),
                (Span::new(5, 5), "+".to_string()),
            ],
        );
        assert_eq!(out, "034+567x9");
    }

    #[test]
    fn test_splice_merges_overlaps() {
        let out = splice(
            "abcdef",
            vec![(Span::new(1, 4), String::new()), (Span::new(2, 5), String::new())],
        );
        assert_eq!(out, "af");
    }

    #[test]
    fn test_line_span_widens_lone_entries() {
        let text = "(\n\t\tA /* a */,\n\t\tB, C,\n)";
        let a = text.find('A').unwrap();
        assert_eq!(line_span(text, Span::new(a, a + 10)), Span::new(2, 15));
        let b = text.find('B').unwrap();
        assert_eq!(line_span(text, Span::new(b, b + 2)), Span::new(b, b + 2));
    }
}
