//! ASCII tree rendering for run reports.

use crate::models::{OperationOutcome, OperationStatus, RunReport};

const APPLIED: char = '●';
const UNCHANGED: char = '○';
const FAILED: char = '✗';

/// Get the status symbol for an operation outcome.
fn status_symbol(status: OperationStatus) -> char {
    match status {
        OperationStatus::Applied => APPLIED,
        OperationStatus::Unchanged => UNCHANGED,
        OperationStatus::Failed => FAILED,
    }
}

/// Render a run report as a tree with status symbols.
///
/// Example output:
/// ```text
/// App.xcodeproj/project.pbxproj
/// ├── ● add AI/Core/Agent.swift [3F2A…, 9C01…]
/// ├── ○ remove LaunchAtLogin: nothing references LaunchAtLogin
/// └── ✗ relocate Foo.swift -> Bar/Foo.swift: `path Foo.swift` is ambiguous: 2 candidates match
/// 1 applied, 1 unchanged, 1 failed (written)
/// ```
pub fn render_report(report: &RunReport) -> String {
    let mut output = String::new();
    output.push_str(&report.manifest.display().to_string());
    output.push('\n');

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let is_last = i == report.outcomes.len() - 1;
        render_outcome(&mut output, outcome, is_last);
    }

    let state = if report.written {
        "written"
    } else if report.changed {
        "not written"
    } else {
        "no changes"
    };
    output.push_str(&format!(
        "{} applied, {} unchanged, {} failed ({})\n",
        report.count(OperationStatus::Applied),
        report.count(OperationStatus::Unchanged),
        report.count(OperationStatus::Failed),
        state
    ));
    output
}

fn render_outcome(output: &mut String, outcome: &OperationOutcome, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push(status_symbol(outcome.status));
    output.push(' ');
    output.push_str(&outcome.operation);
    if !outcome.ids.is_empty() {
        output.push_str(&format!(" [{}]", outcome.ids.join(", ")));
    }
    if let Some(detail) = &outcome.detail {
        output.push_str(": ");
        output.push_str(detail);
    }
    output.push('\n');
}
