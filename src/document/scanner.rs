//! Lexical helpers shared by the locator and the graph parser.
//!
//! Quoted strings and comments are opaque: braces, parentheses and semicolons
//! inside them never count toward nesting.

/// If a string or comment starts at `i`, return the offset just past it.
pub(crate) fn skip_opaque(bytes: &[u8], i: usize) -> Option<usize> {
    match *bytes.get(i)? {
        b'"' => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 2,
                    b'"' => return Some(j + 1),
                    _ => j += 1,
                }
            }
            Some(bytes.len())
        }
        b'/' if bytes.get(i + 1) == Some(&b'*') => Some(
            find_bytes(bytes, i + 2, b"*/")
                .map(|p| p + 2)
                .unwrap_or(bytes.len()),
        ),
        b'/' if bytes.get(i + 1) == Some(&b'/') => Some(line_end(bytes, i)),
        _ => None,
    }
}

/// Offset of the bracket closing the `{` or `(` at `open`.
pub(crate) fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let (o, c) = match bytes.get(open)? {
        b'{' => (b'{', b'}'),
        b'(' => (b'(', b')'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_opaque(bytes, i) {
            i = next;
            continue;
        }
        let b = bytes[i];
        if b == o {
            depth += 1;
        } else if b == c {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Offset of the first `;` at nesting depth zero in `from..limit`.
pub(crate) fn statement_end(bytes: &[u8], from: usize, limit: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = from;
    while i < limit {
        if let Some(next) = skip_opaque(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' | b'(' => depth += 1,
            b'}' | b')' => depth -= 1,
            b';' if depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

pub(crate) fn find_bytes(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

pub(crate) fn skip_ws(bytes: &[u8], mut i: usize, limit: usize) -> usize {
    while i < limit && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Start of the line containing `i`.
pub(crate) fn line_start(bytes: &[u8], i: usize) -> usize {
    bytes[..i]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0)
}

/// Offset just past the newline ending the line containing `i`.
pub(crate) fn line_end(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| i + p + 1)
        .unwrap_or(bytes.len())
}

/// Leading whitespace of the line containing `i`.
pub(crate) fn indentation(text: &str, i: usize) -> &str {
    let start = line_start(text.as_bytes(), i);
    let rest = &text[start..];
    let len = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..len]
}

/// True when `span` is the only non-blank content of the line(s) it covers.
pub(crate) fn owns_lines(bytes: &[u8], start: usize, end: usize) -> bool {
    let before = &bytes[line_start(bytes, start)..start];
    let after_end = line_end(bytes, end.saturating_sub(1).max(start));
    let after = &bytes[end..after_end.max(end)];
    before.iter().all(|b| *b == b' ' || *b == b'\t')
        && after.iter().all(|b| b.is_ascii_whitespace())
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Whether `needle` occurs in `haystack` bounded by non-token characters.
pub fn contains_token(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        !before.is_some_and(is_token_char) && !after.is_some_and(is_token_char)
    })
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric characters.
///
/// Looser than [`contains_token`]: `LaunchAtLogin_LaunchAtLogin.bundle`
/// mentions `LaunchAtLogin`.
pub fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}
