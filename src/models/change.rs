use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything a caller wants done to one manifest in a single run.
///
/// Entries are applied in the order: `add`, `relocate`, `repoint`, `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChangeSet {
    #[serde(default)]
    pub add: Vec<FileAddition>,
    #[serde(default)]
    pub relocate: Vec<Relocation>,
    #[serde(default)]
    pub repoint: Vec<PackageRepoint>,
    /// Product names of package dependencies to remove.
    #[serde(default)]
    pub remove: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
            && self.relocate.is_empty()
            && self.repoint.is_empty()
            && self.remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.add.len() + self.relocate.len() + self.repoint.len() + self.remove.len()
    }
}

/// A source file to reference, group and optionally compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileAddition {
    /// Path relative to the containing group, e.g. `AI/Core/Agent.swift`.
    pub path: String,
    /// `lastKnownFileType`. Inferred from the extension when omitted.
    #[serde(default)]
    pub kind: Option<String>,
    /// Group whose `children` receive the new reference.
    #[serde(default)]
    pub group: Option<String>,
    /// Build phase for compiled files. Defaults to `Sources`; ignored for headers.
    #[serde(default)]
    pub phase: Option<String>,
    /// Target owning the phase, needed when several targets share a phase name.
    #[serde(default)]
    pub target: Option<String>,
    /// Skip the build phase even for compiled files.
    #[serde(default)]
    pub no_build: bool,
    /// Reuse an existing reference with the same path instead of adding another.
    #[serde(default)]
    pub idempotent: bool,
}

impl FileAddition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: None,
            group: None,
            phase: None,
            target: None,
            no_build: false,
            idempotent: false,
        }
    }
}

/// Rewrite of one file reference's `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Relocation {
    pub from: String,
    pub to: String,
    /// Only consider references that are children of this group.
    #[serde(default)]
    pub group: Option<String>,
}

/// Move a remote package reference to another repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackageRepoint {
    pub from_url: String,
    pub to_url: String,
}

/// Identifies a build phase, optionally through the target that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSelector {
    pub name: String,
    pub target: Option<String>,
}

impl PhaseSelector {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    pub fn in_target(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Some(target.into()),
        }
    }
}

impl std::fmt::Display for PhaseSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} ({})", self.name, target),
            None => f.write_str(&self.name),
        }
    }
}
