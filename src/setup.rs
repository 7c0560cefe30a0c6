//! Destination directory preparation
//!
//! Compilation assumes every destination's parent directory exists and is
//! writable. This module checks that and creates what is missing; it never
//! changes permissions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FileMapping;

/// State of one destination directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// Already present and writable
    Existing { path: PathBuf },
    /// Created by this call
    Created { path: PathBuf },
    /// Present but read-only
    NotWritable { path: PathBuf },
    /// Could not be created
    Failed { path: PathBuf, message: String },
}

impl DirectoryStatus {
    pub fn path(&self) -> &Path {
        match self {
            DirectoryStatus::Existing { path }
            | DirectoryStatus::Created { path }
            | DirectoryStatus::NotWritable { path }
            | DirectoryStatus::Failed { path, .. } => path,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            DirectoryStatus::Existing { .. } | DirectoryStatus::Created { .. }
        )
    }

    pub fn message(&self) -> String {
        let path = self.path().display();
        match self {
            DirectoryStatus::Existing { .. } => format!("Output folder '{path}' is ready"),
            DirectoryStatus::Created { .. } => format!("Added output folder '{path}'"),
            DirectoryStatus::NotWritable { .. } => format!("Output folder '{path}' is not writable"),
            DirectoryStatus::Failed { message, .. } => {
                format!("Could not create output folder '{path}': {message}")
            }
        }
    }
}

/// Ensure each destination's parent directory exists, once per directory,
/// in mapping order.
pub fn prepare_destinations(base: &Path, mappings: &[FileMapping]) -> Vec<DirectoryStatus> {
    let mut seen = HashSet::new();
    let mut statuses = Vec::new();

    for mapping in mappings {
        let destination = base.join(&mapping.destination);
        let Some(dir) = destination.parent().map(Path::to_path_buf) else {
            continue;
        };
        if !seen.insert(dir.clone()) {
            continue;
        }

        let status = prepare_directory(&dir);
        match &status {
            DirectoryStatus::Created { path } => debug!(dir = %path.display(), "created output folder"),
            DirectoryStatus::NotWritable { path } => {
                warn!(dir = %path.display(), "output folder is not writable")
            }
            DirectoryStatus::Failed { path, message } => {
                warn!(dir = %path.display(), error = %message, "could not create output folder")
            }
            DirectoryStatus::Existing { .. } => {}
        }
        statuses.push(status);
    }

    statuses
}

fn prepare_directory(dir: &Path) -> DirectoryStatus {
    if dir.is_dir() {
        let writable = fs::metadata(dir)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false);
        return if writable {
            DirectoryStatus::Existing {
                path: dir.to_path_buf(),
            }
        } else {
            DirectoryStatus::NotWritable {
                path: dir.to_path_buf(),
            }
        };
    }

    match fs::create_dir_all(dir) {
        Ok(()) => DirectoryStatus::Created {
            path: dir.to_path_buf(),
        },
        Err(e) => DirectoryStatus::Failed {
            path: dir.to_path_buf(),
            message: e.to_string(),
        },
    }
}
