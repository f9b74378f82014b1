//! Segmentation command handler.

use tabled::Tabled;

use segnet_core::{SegmentationIssue, Severity};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::util::Session;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn handle(session: &Session) -> Result<(), CliError> {
    let issues = session.simulator.analyze_segmentation(&session.topology)?;

    // Structured formats still print an empty list.
    if issues.is_empty() && matches!(session.format, OutputFormat::Table | OutputFormat::Plain) {
        session.note("No segmentation issues found");
        return Ok(());
    }

    let row = |i: &SegmentationIssue| IssueRow {
        severity: output::paint_severity(i.severity, session.color),
        kind: i.kind.to_string(),
        message: i.message.clone(),
    };
    let out = output::render_list(session.format, &issues, row, |i| {
        format!("{} {}", i.severity, i.message)
    })?;
    session.print(&out);

    let high = issues.iter().filter(|i| i.severity == Severity::High).count();
    session.note(&format!("{} issues ({high} high)", issues.len()));
    Ok(())
}
