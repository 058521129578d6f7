use thiserror::Error;

/// Errors produced while reading, mutating or writing a project manifest.
///
/// Lookup failures (`SectionMissing`, `GroupNotFound`, `PhaseNotFound`,
/// `PathNotFound`, `RecordNotFound`, `ReferenceNotFound`) are soft: the engine
/// skips the operation that raised them and keeps going. `AllocationExhausted`,
/// `CorruptionDetected` and `Io` abort the whole run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("section `{0}` not found")]
    SectionMissing(String),

    #[error("group `{0}` not found")]
    GroupNotFound(String),

    #[error("build phase `{0}` not found")]
    PhaseNotFound(String),

    #[error("no file reference with path `{0}`")]
    PathNotFound(String),

    #[error("no record named `{name}` owning a `{field}` list")]
    RecordNotFound { name: String, field: String },

    #[error("reference `{0}` not found")]
    ReferenceNotFound(String),

    #[error("`{what}` is ambiguous: {count} candidates match")]
    Ambiguous { what: String, count: usize },

    #[error("id `{0}` has no matching record")]
    DanglingReference(String),

    #[error("malformed manifest at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },

    #[error("identifier space exhausted after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error("unbalanced braces in output ({open} `{{` vs {close} `}}`)")]
    CorruptionDetected { open: usize, close: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the lookup failures the engine recovers from per operation.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionMissing(_)
                | Self::GroupNotFound(_)
                | Self::PhaseNotFound(_)
                | Self::PathNotFound(_)
                | Self::RecordNotFound { .. }
                | Self::ReferenceNotFound(_)
        )
    }

    /// True when the run must stop before anything is written.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AllocationExhausted { .. } | Self::CorruptionDetected { .. } | Self::Io(_)
        )
    }

    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
