//! Compiler strategies
//!
//! A [`CompilerStrategy`] turns the configured file mappings into one
//! [`FileReport`] per mapping, in input order. Two variants exist:
//!
//! - [`ServerCompiler`] checks staleness and runs `lessc` for stale files
//! - [`ClientCompiler`] leaves compilation to `less.js` in the browser

mod client;
mod server;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{CompilationOptions, FileMapping, Mode};
use crate::error::{BuildError, BuildResult};

pub use client::{ClientCompiler, ClientManifest, ClientStylesheet};
pub use server::ServerCompiler;

/// Why a mapping was not compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Destination is newer than the source and all of its imports
    UpToDate,
    /// Compilation happens in the browser
    ClientSide,
}

/// What a successful compilation did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileAction {
    Created,
    Updated,
}

/// Per-file result of a run.
#[derive(Debug)]
pub enum CompileOutcome {
    Skipped(SkipReason),
    Compiled(CompileAction),
    Failed(BuildError),
}

impl CompileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CompileOutcome::Failed(_))
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled(_))
    }

    /// Short status word: created, updated, skipped, deferred or error.
    pub fn status(&self) -> &'static str {
        match self {
            CompileOutcome::Skipped(SkipReason::UpToDate) => "skipped",
            CompileOutcome::Skipped(SkipReason::ClientSide) => "deferred",
            CompileOutcome::Compiled(CompileAction::Created) => "created",
            CompileOutcome::Compiled(CompileAction::Updated) => "updated",
            CompileOutcome::Failed(_) => "error",
        }
    }
}

/// Outcome for one mapping together with its resolved paths.
#[derive(Debug)]
pub struct FileReport {
    pub mapping: FileMapping,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub outcome: CompileOutcome,
}

impl FileReport {
    /// Human-readable line for this file.
    pub fn message(&self) -> String {
        let source = self.mapping.source.display();
        let destination = self.mapping.destination.display();
        match &self.outcome {
            CompileOutcome::Compiled(CompileAction::Created) => {
                format!("Created {} from {}", destination, source)
            }
            CompileOutcome::Compiled(CompileAction::Updated) => {
                format!("Updated {} from {}", destination, source)
            }
            CompileOutcome::Skipped(SkipReason::UpToDate) => {
                format!("Skipped {} (up to date)", destination)
            }
            CompileOutcome::Skipped(SkipReason::ClientSide) => {
                format!("Deferred {} to the client runtime", source)
            }
            CompileOutcome::Failed(err) => format!("Error in {}: {}", source, err),
        }
    }
}

/// All file reports of one run, in input order.
#[derive(Debug)]
pub struct RunReport {
    pub mode: Mode,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        !self.files.iter().any(|f| f.outcome.is_failed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_failed())
    }

    pub fn compiled_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_compiled()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, CompileOutcome::Skipped(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Turn a run with any failure into a single run-level error.
    ///
    /// The report is still available to callers that inspect it first; this
    /// is for callers that only need pass/fail.
    pub fn into_result(self) -> BuildResult<RunReport> {
        if self.is_success() {
            return Ok(self);
        }

        let details = self
            .failures()
            .map(|f| format!("  {}", f.message()))
            .collect::<Vec<_>>()
            .join("\n");

        Err(BuildError::RunFailed {
            failed: self.failed_count(),
            total: self.files.len(),
            details,
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} compiled, {} skipped, {} failed",
            self.compiled_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}

/// Turns file mappings into per-file outcomes.
pub trait CompilerStrategy {
    /// Mode this strategy implements
    fn mode(&self) -> Mode;

    /// Process every mapping in order. A failure for one file never stops
    /// the remaining files.
    fn run(&self, mappings: &[FileMapping], options: &CompilationOptions) -> RunReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: CompileOutcome) -> FileReport {
        FileReport {
            mapping: FileMapping::new("less/a.less", "css/a.css"),
            source_path: PathBuf::from("/web/less/a.less"),
            destination_path: PathBuf::from("/web/css/a.css"),
            outcome,
        }
    }

    #[test]
    fn run_report_counts_and_display() {
        let run = RunReport {
            mode: Mode::Server,
            files: vec![
                report(CompileOutcome::Compiled(CompileAction::Created)),
                report(CompileOutcome::Skipped(SkipReason::UpToDate)),
                report(CompileOutcome::Failed(BuildError::SourceUnreadable {
                    path: PathBuf::from("/web/less/a.less"),
                })),
            ],
        };

        assert!(!run.is_success());
        assert_eq!(run.to_string(), "1 compiled, 1 skipped, 1 failed");
    }

    #[test]
    fn into_result_keeps_successful_run() {
        let run = RunReport {
            mode: Mode::Server,
            files: vec![report(CompileOutcome::Compiled(CompileAction::Updated))],
        };
        let run = run.into_result().unwrap();
        assert_eq!(run.files[0].outcome.status(), "updated");
    }

    #[test]
    fn into_result_summarizes_failures() {
        let run = RunReport {
            mode: Mode::Server,
            files: vec![
                report(CompileOutcome::Compiled(CompileAction::Updated)),
                report(CompileOutcome::Failed(BuildError::SourceUnreadable {
                    path: PathBuf::from("/web/less/a.less"),
                })),
            ],
        };

        let err = run.into_result().unwrap_err();
        match err {
            BuildError::RunFailed {
                failed,
                total,
                details,
            } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
                assert!(details.contains("source path must be readable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn file_report_messages() {
        assert_eq!(
            report(CompileOutcome::Compiled(CompileAction::Created)).message(),
            "Created css/a.css from less/a.less"
        );
        assert_eq!(
            report(CompileOutcome::Skipped(SkipReason::UpToDate)).message(),
            "Skipped css/a.css (up to date)"
        );
        assert_eq!(
            report(CompileOutcome::Skipped(SkipReason::ClientSide)).message(),
            "Deferred less/a.less to the client runtime"
        );
    }
}
