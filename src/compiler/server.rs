//! Server-side compilation through an external `lessc`

use std::fs::File;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{CompilationOptions, FileMapping, Mode};
use crate::error::BuildError;
use crate::process::{compile_file, ProcessRunner, SystemRunner};
use crate::staleness;

use super::{CompileAction, CompileOutcome, CompilerStrategy, FileReport, RunReport, SkipReason};

/// Compiles stale sources ahead of time.
#[derive(Debug, Clone, Default)]
pub struct ServerCompiler<R = SystemRunner> {
    runner: R,
}

impl ServerCompiler<SystemRunner> {
    pub fn new() -> Self {
        Self {
            runner: SystemRunner::new(),
        }
    }
}

impl<R: ProcessRunner> ServerCompiler<R> {
    /// Use a custom process runner (tests, dry runs).
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn compile_mapping(&self, mapping: &FileMapping, options: &CompilationOptions) -> FileReport {
        let joined_source = options.source_path(mapping);
        // Fall back to the joined path so errors still name something useful
        let source_path = joined_source.canonicalize().unwrap_or(joined_source);
        let destination_path = options.destination_path(mapping);

        let staleness = staleness::check(&source_path, &destination_path, options.force);
        debug!(
            source = %source_path.display(),
            destination = %destination_path.display(),
            reason = %staleness.describe(),
            "staleness resolved"
        );

        let outcome = if !staleness.is_stale() {
            CompileOutcome::Skipped(SkipReason::UpToDate)
        } else if !is_readable(&source_path) {
            CompileOutcome::Failed(BuildError::SourceUnreadable {
                path: source_path.clone(),
            })
        } else {
            let action = if destination_path.exists() {
                CompileAction::Updated
            } else {
                CompileAction::Created
            };

            match compile_file(&self.runner, &source_path, &destination_path, options) {
                Ok(()) => {
                    info!(
                        source = %source_path.display(),
                        destination = %destination_path.display(),
                        "compiled stylesheet"
                    );
                    CompileOutcome::Compiled(action)
                }
                Err(err) => CompileOutcome::Failed(err),
            }
        };

        if let CompileOutcome::Failed(err) = &outcome {
            warn!(source = %source_path.display(), error = %err, "compilation failed");
        }

        FileReport {
            mapping: mapping.clone(),
            source_path,
            destination_path,
            outcome,
        }
    }
}

impl<R: ProcessRunner> CompilerStrategy for ServerCompiler<R> {
    fn mode(&self) -> Mode {
        Mode::Server
    }

    fn run(&self, mappings: &[FileMapping], options: &CompilationOptions) -> RunReport {
        let files = mappings
            .iter()
            .map(|mapping| self.compile_mapping(mapping, options))
            .collect();

        RunReport {
            mode: Mode::Server,
            files,
        }
    }
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
