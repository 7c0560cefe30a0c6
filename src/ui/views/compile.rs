use lessbuild::{CompileOutcome, FileReport, RunReport, SkipReason};
use serde_json::json;

use crate::ui::theme::{dim, Icon};

pub fn render_file_report(report: &FileReport, supports_color: bool, supports_unicode: bool) -> String {
    let icon = match &report.outcome {
        CompileOutcome::Compiled(_) => Icon::Success,
        CompileOutcome::Skipped(SkipReason::UpToDate) => Icon::Pending,
        CompileOutcome::Skipped(SkipReason::ClientSide) => Icon::Arrow,
        CompileOutcome::Failed(_) => Icon::Error,
    };

    let message = report.message();
    let message = match report.outcome {
        CompileOutcome::Skipped(SkipReason::UpToDate) => dim(&message, supports_color),
        _ => message,
    };

    format!("{} {}", icon.colored(supports_color, supports_unicode), message)
}

pub fn render_summary(report: &RunReport, supports_color: bool, supports_unicode: bool) -> String {
    let icon = if report.is_success() {
        Icon::Success
    } else {
        Icon::Warning
    };
    format!(
        "\n{} {} mode: {}\n",
        icon.colored(supports_color, supports_unicode),
        report.mode,
        report
    )
}

pub fn file_event(report: &FileReport) -> serde_json::Value {
    let error = match &report.outcome {
        CompileOutcome::Failed(err) => Some(json!({
            "code": err.code(),
            "message": err.to_string(),
        })),
        _ => None,
    };

    json!({
        "event": "file",
        "source": report.mapping.source.display().to_string(),
        "destination": report.mapping.destination.display().to_string(),
        "status": report.outcome.status(),
        "message": report.message(),
        "error": error,
    })
}

pub fn complete_event(report: &RunReport) -> serde_json::Value {
    json!({
        "event": "complete",
        "mode": report.mode,
        "compiled": report.compiled_count(),
        "skipped": report.skipped_count(),
        "failed": report.failed_count(),
        "success": report.is_success(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessbuild::{BuildError, CompileAction, FileMapping, Mode};
    use std::path::PathBuf;

    fn report(outcome: CompileOutcome) -> FileReport {
        FileReport {
            mapping: FileMapping::new("less/site.less", "css/site.css"),
            source_path: PathBuf::from("/web/less/site.less"),
            destination_path: PathBuf::from("/web/css/site.css"),
            outcome,
        }
    }

    #[test]
    fn renders_each_outcome_with_its_icon() {
        let created = render_file_report(
            &report(CompileOutcome::Compiled(CompileAction::Created)),
            false,
            false,
        );
        assert_eq!(created, "[OK] Created css/site.css from less/site.less");

        let skipped = render_file_report(
            &report(CompileOutcome::Skipped(SkipReason::UpToDate)),
            false,
            false,
        );
        assert_eq!(skipped, "[ ] Skipped css/site.css (up to date)");

        let failed = render_file_report(
            &report(CompileOutcome::Failed(BuildError::SourceUnreadable {
                path: PathBuf::from("/web/less/site.less"),
            })),
            false,
            false,
        );
        assert!(failed.starts_with("[FAIL] Error in less/site.less"));
    }

    #[test]
    fn summary_counts_outcomes() {
        let run = RunReport {
            mode: Mode::Server,
            files: vec![report(CompileOutcome::Compiled(CompileAction::Updated))],
        };
        assert_eq!(
            render_summary(&run, false, false),
            "\n[OK] server mode: 1 compiled, 0 skipped, 0 failed\n"
        );
    }

    #[test]
    fn file_event_carries_error_code() {
        let event = file_event(&report(CompileOutcome::Failed(BuildError::SourceUnreadable {
            path: PathBuf::from("/web/less/site.less"),
        })));
        assert_eq!(event["status"], "error");
        assert_eq!(event["error"]["code"], "source_unreadable");
    }

    #[test]
    fn complete_event_reports_mode() {
        let run = RunReport {
            mode: Mode::Client,
            files: vec![report(CompileOutcome::Skipped(SkipReason::ClientSide))],
        };
        let event = complete_event(&run);
        assert_eq!(event["mode"], "client");
        assert_eq!(event["skipped"], 1);
        assert_eq!(event["success"], true);
    }
}
