use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a single requested operation ended.
///
/// - `Applied`: the document changed
/// - `Unchanged`: nothing to do (idempotent add hit, dependency already gone)
/// - `Failed`: a lookup failed; the document was left as it was before the operation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Applied,
    Unchanged,
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Short description such as `add AI/Core/Agent.swift`.
    pub operation: String,
    pub status: OperationStatus,
    /// Failure reason or a note about what was touched.
    pub detail: Option<String>,
    /// Ids allocated or removed by the operation.
    pub ids: Vec<String>,
}

impl OperationOutcome {
    pub fn applied(operation: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            operation: operation.into(),
            status: OperationStatus::Applied,
            detail: None,
            ids,
        }
    }

    pub fn unchanged(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: OperationStatus::Unchanged,
            detail: Some(detail.into()),
            ids: Vec::new(),
        }
    }

    pub fn failed(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: OperationStatus::Failed,
            detail: Some(detail.into()),
            ids: Vec::new(),
        }
    }
}

/// Summary of one load/apply/write session.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub manifest: PathBuf,
    pub outcomes: Vec<OperationOutcome>,
    /// Whether the text differs from what was loaded.
    pub changed: bool,
    /// Whether the file on disk was replaced.
    pub written: bool,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.status == OperationStatus::Failed)
    }

    pub fn count(&self, status: OperationStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
