//! Run orchestration
//!
//! Picks the compiler strategy for the configured mode, prepares destination
//! folders, runs every mapping and hands back the per-file reports.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::compiler::{ClientCompiler, CompilerStrategy, RunReport, ServerCompiler};
use crate::config::{Config, FileMapping, Mode};
use crate::error::BuildResult;
use crate::setup::{prepare_destinations, DirectoryStatus};
use crate::staleness::{self, Staleness};

/// Staleness of one mapping, computed without compiling anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub mapping: FileMapping,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub staleness: Staleness,
}

/// Strategy for a mode.
pub fn strategy_for(config: &Config) -> Box<dyn CompilerStrategy> {
    match config.mode {
        Mode::Server => Box::new(ServerCompiler::new()),
        Mode::Client => Box::new(ClientCompiler::new(config.client.clone())),
    }
}

/// Drives one compilation run.
pub struct Orchestrator {
    config: Config,
    strategy: Box<dyn CompilerStrategy>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        let strategy = strategy_for(&config);
        Self { config, strategy }
    }

    pub fn mode(&self) -> Mode {
        self.strategy.mode()
    }

    /// Run every mapping.
    ///
    /// `Err` is reserved for run-level problems such as an unwritable client
    /// manifest. Per-file failures stay inside the report; call
    /// [`RunReport::into_result`] to turn them into an error.
    pub fn run(&self) -> BuildResult<RunReport> {
        let options = &self.config.options;
        let mappings = &self.config.files;

        info!(
            mode = %self.mode(),
            files = mappings.len(),
            base = %options.base_path.display(),
            "starting run"
        );

        if self.mode() == Mode::Server && options.create_destination_dirs {
            self.prepare();
        }

        let report = self.strategy.run(mappings, options);

        if self.mode() == Mode::Client {
            ClientCompiler::new(self.config.client.clone()).write_manifest(mappings, options)?;
        }

        info!(mode = %report.mode, summary = %report, "run finished");
        Ok(report)
    }

    /// Ensure destination folders exist.
    pub fn prepare(&self) -> Vec<DirectoryStatus> {
        let statuses = prepare_destinations(&self.config.options.base_path, &self.config.files);
        debug!(folders = statuses.len(), "prepared output folders");
        statuses
    }

    /// Staleness of every mapping, in order. Nothing is compiled.
    pub fn status(&self) -> Vec<StatusEntry> {
        let options = &self.config.options;
        self.config
            .files
            .iter()
            .map(|mapping| {
                let joined = options.source_path(mapping);
                let source_path = joined.canonicalize().unwrap_or(joined);
                let destination_path = options.destination_path(mapping);
                let staleness = match self.mode() {
                    Mode::Client => Staleness::Deferred,
                    Mode::Server => {
                        staleness::check(&source_path, &destination_path, options.force)
                    }
                };
                StatusEntry {
                    mapping: mapping.clone(),
                    source_path,
                    destination_path,
                    staleness,
                }
            })
            .collect()
    }
}
