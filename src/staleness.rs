//! Staleness resolution for compiled stylesheets
//!
//! Decides whether a destination artifact must be regenerated by comparing
//! modification times of the source, the destination, and every source
//! reachable through `@import` directives.
//!
//! The import graph is rebuilt on every call and may contain cycles. Each
//! call owns its own visited set, so a file is scanned at most once per call
//! and nothing leaks between calls.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::scanner::scan_imports;

/// Extension tried when an import reference has none.
const LESS_EXTENSION: &str = "less";

/// Why a destination is (or is not) stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// Force-recompile is set
    Forced,
    /// The source does not exist
    MissingSource,
    /// The destination does not exist
    MissingDestination,
    /// The source itself changed after the destination was written
    SourceNewer,
    /// A transitively imported file changed after the destination was written
    ImportNewer(PathBuf),
    /// Nothing reachable is newer than the destination
    UpToDate,
    /// Compiled in the browser; timestamps are not inspected
    Deferred,
}

impl Staleness {
    pub fn is_stale(&self) -> bool {
        !matches!(self, Staleness::UpToDate | Staleness::Deferred)
    }

    /// Short human description for reports.
    pub fn describe(&self) -> String {
        match self {
            Staleness::Forced => "forced".to_string(),
            Staleness::MissingSource => "source missing".to_string(),
            Staleness::MissingDestination => "destination missing".to_string(),
            Staleness::SourceNewer => "source changed".to_string(),
            Staleness::ImportNewer(path) => format!("import changed: {}", path.display()),
            Staleness::UpToDate => "up to date".to_string(),
            Staleness::Deferred => "deferred".to_string(),
        }
    }
}

/// Whether `destination` must be regenerated from `source`.
pub fn needs_recompilation(source: &Path, destination: &Path, force: bool) -> bool {
    check(source, destination, force).is_stale()
}

/// Resolve staleness and report the reason.
pub fn check(source: &Path, destination: &Path, force: bool) -> Staleness {
    if force {
        return Staleness::Forced;
    }

    let Some(dest_mtime) = modified(destination) else {
        return Staleness::MissingDestination;
    };

    if !source.exists() {
        return Staleness::MissingSource;
    }

    match modified(source) {
        Some(src_mtime) if src_mtime > dest_mtime => return Staleness::SourceNewer,
        Some(_) => {}
        // Exists but mtime is unreadable: treat like a missing source
        None => return Staleness::MissingSource,
    }

    match find_newer_import(source, dest_mtime) {
        Some(import) => {
            debug!(
                source = %source.display(),
                import = %import.display(),
                "import is newer than destination"
            );
            Staleness::ImportNewer(import)
        }
        None => Staleness::UpToDate,
    }
}

/// Walk the import graph reachable from `root` depth-first and return the
/// first resolved import modified after `reference`.
///
/// `root` itself is marked visited up front, so `a -> b -> a` terminates
/// after scanning each file once.
fn find_newer_import(root: &Path, reference: SystemTime) -> Option<PathBuf> {
    walk_imports(root, reference, read_lossy)
}

fn walk_imports(
    root: &Path,
    reference: SystemTime,
    mut read: impl FnMut(&Path) -> Option<String>,
) -> Option<PathBuf> {
    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(canonical(root));

    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(file) = stack.pop() {
        let Some(content) = read(&file) else {
            continue;
        };
        let base = file.parent().unwrap_or_else(|| Path::new(""));

        let mut children = Vec::new();
        for reference_str in scan_imports(&content) {
            let Some(import) = resolve_import(base, &reference_str) else {
                debug!(
                    importer = %file.display(),
                    import = %reference_str,
                    "skipping unresolved import"
                );
                continue;
            };

            if !visited.insert(import.clone()) {
                continue;
            }

            if modified(&import).is_some_and(|mtime| mtime > reference) {
                return Some(import);
            }
            children.push(import);
        }

        // Reverse so the first import in the document is scanned first
        stack.extend(children.into_iter().rev());
    }

    None
}

/// Resolve an import reference against the importing file's directory.
///
/// Returns a canonical path, or `None` when nothing exists at the reference.
pub fn resolve_import(base: &Path, reference: &str) -> Option<PathBuf> {
    let candidate = base.join(reference);
    if candidate.is_file() {
        return Some(canonical(&candidate));
    }

    if candidate.extension().is_none() {
        let with_ext = candidate.with_extension(LESS_EXTENSION);
        if with_ext.is_file() {
            return Some(canonical(&with_ext));
        }
    }

    None
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn read_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
