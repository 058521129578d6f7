use serde::Serialize;

use super::Span;

/// The `isa` of a record, folded into the families the mutations care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    FileReference,
    BuildFile,
    Group,
    /// Any `PBX*BuildPhase`; keeps the concrete `isa`.
    BuildPhase(String),
    Target,
    Project,
    PackageReference,
    PackageProductReference,
    BuildConfiguration,
    Other(String),
}

impl ObjectKind {
    pub fn from_isa(isa: &str) -> Self {
        match isa {
            "PBXFileReference" => Self::FileReference,
            "PBXBuildFile" => Self::BuildFile,
            "PBXGroup" | "PBXVariantGroup" | "XCVersionGroup" => Self::Group,
            "PBXNativeTarget" | "PBXAggregateTarget" | "PBXLegacyTarget" => Self::Target,
            "PBXProject" => Self::Project,
            "XCRemoteSwiftPackageReference" | "XCLocalSwiftPackageReference" => {
                Self::PackageReference
            }
            "XCSwiftPackageProductDependency" => Self::PackageProductReference,
            "XCBuildConfiguration" => Self::BuildConfiguration,
            other if other.starts_with("PBX") && other.ends_with("BuildPhase") => {
                Self::BuildPhase(other.to_string())
            }
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_build_phase(&self) -> bool {
        matches!(self, Self::BuildPhase(_))
    }

    pub fn is_shell_script(&self) -> bool {
        matches!(self, Self::BuildPhase(isa) if isa == "PBXShellScriptBuildPhase")
    }
}

/// One `key = value;` pair inside a record body.
///
/// `raw` is the value exactly as written, including quotes and any trailing
/// `/* comment */` (as in `fileRef = ABC /* App.swift */;`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    pub raw: String,
    pub key_span: Span,
    pub value_span: Span,
}

impl Field {
    /// The value with quotes, escapes and trailing comment removed.
    pub fn literal(&self) -> String {
        literal_value(&self.raw)
    }

    pub fn is_quoted(&self) -> bool {
        self.raw.starts_with('"')
    }

    pub fn is_list(&self) -> bool {
        self.raw.starts_with('(')
    }
}

/// A single object of the manifest's `objects` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    pub id: String,
    pub comment: Option<String>,
    pub kind: ObjectKind,
    /// Fields in document order.
    pub fields: Vec<Field>,
    /// From the first byte of the id through the terminating `;`.
    pub span: Span,
    /// Between the record's own `{` and `}`.
    pub body: Span,
    /// Name of the section the record was found in.
    pub section: String,
}

impl ObjectRecord {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Literal value of `key`, if present.
    pub fn value(&self, key: &str) -> Option<String> {
        self.field(key).map(Field::literal)
    }

    /// The human-readable label: the comment, falling back to the id.
    pub fn label(&self) -> &str {
        self.comment.as_deref().unwrap_or(&self.id)
    }
}

/// Strip quoting and any trailing comment from a raw value.
pub fn literal_value(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('"') {
        let mut out = String::with_capacity(rest.len());
        let mut chars = rest.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => break,
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                },
                c => out.push(c),
            }
        }
        return out;
    }

    let end = raw
        .find("/*")
        .unwrap_or(raw.len())
        .min(raw.find(char::is_whitespace).unwrap_or(raw.len()));
    raw[..end].to_string()
}

/// Render `value` the way the manifest writes strings: bare when it only uses
/// safe characters, double-quoted and escaped otherwise.
pub fn quote_if_needed(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'))
        && !value.contains("//");
    if safe {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Always double-quote `value`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Make `text` safe to embed in a `/* … */` comment.
pub fn comment_text(text: &str) -> String {
    text.replace("*/", "* /")
}
