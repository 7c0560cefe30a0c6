//! File watcher for continuous compilation
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms)
//! - Import-aware recompilation (every pass re-resolves staleness)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;

use crate::config::Config;
use crate::error::{BuildError, BuildResult};
use crate::orchestrator::Orchestrator;

/// Debounce duration in milliseconds
const DEBOUNCE_MS: u64 = 100;

/// Only changes to these files trigger a run
const WATCHED_EXTENSION: &str = "less";

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub config: Config,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    Started { path: String },
    FileChanged { path: String },
    RunStarted,
    RunComplete {
        compiled: usize,
        skipped: usize,
        failed: usize,
    },
    FileFailed { path: String, message: String },
    Error { message: String },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"error"}"#.to_string())
    }
}

/// Watcher state for debouncing
struct WatcherState {
    pending_changes: HashSet<PathBuf>,
    last_change: Option<Instant>,
}

impl WatcherState {
    fn new() -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
        }
    }

    fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    fn should_run(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty()
                && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    /// Drain the batch, sorted so events come out in a stable order.
    fn take_changes(&mut self) -> Vec<PathBuf> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }
}

fn is_watched(path: &std::path::Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(WATCHED_EXTENSION))
        .unwrap_or(false)
}

/// Start watching for source changes
///
/// Runs once immediately, then again after every debounced batch of
/// `.less` changes under the base path, until `running` turns false.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> BuildResult<()> {
    let root = options.config.options.base_path.clone();
    let orchestrator = Orchestrator::new(options.config);

    event_callback(WatchEvent::Started {
        path: root.display().to_string(),
    });

    do_run(&orchestrator, &event_callback);

    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| BuildError::Watch {
        message: e.to_string(),
    })?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| BuildError::Watch {
            message: e.to_string(),
        })?;

    let mut state = WatcherState::new();

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if is_watched(&path) {
                state.add_change(path);
            }
        }

        if state.should_run() {
            run_batch(state.take_changes(), &orchestrator, &event_callback);
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

fn run_batch(changes: Vec<PathBuf>, orchestrator: &Orchestrator, callback: &impl Fn(WatchEvent)) {
    for path in changes {
        callback(WatchEvent::FileChanged {
            path: path.display().to_string(),
        });
    }
    do_run(orchestrator, callback);
}

fn do_run(orchestrator: &Orchestrator, callback: &impl Fn(WatchEvent)) {
    callback(WatchEvent::RunStarted);

    let report = match orchestrator.run() {
        Ok(report) => report,
        Err(e) => {
            callback(WatchEvent::Error {
                message: e.to_string(),
            });
            return;
        }
    };

    for failure in report.failures() {
        callback(WatchEvent::FileFailed {
            path: failure.mapping.source.display().to_string(),
            message: failure.message(),
        });
    }

    callback(WatchEvent::RunComplete {
        compiled: report.compiled_count(),
        skipped: report.skipped_count(),
        failed: report.failed_count(),
    });
}
