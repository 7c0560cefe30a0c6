//! Error types for lessbuild
//!
//! Library code returns [`BuildError`]; the binary wraps it in `anyhow`.
//! Configuration variants are raised while loading, before any file is
//! processed. File-scoped variants end up inside a `CompileOutcome::Failed`
//! and never abort the rest of a run.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for lessbuild operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Main error type for lessbuild operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Compilation mode is neither "client" nor "server"
    #[error("invalid mode '{value}': mode must be either \"client\" or \"server\"")]
    InvalidMode { value: String },

    /// Compression is not one of the supported methods
    #[error("invalid compression '{value}': compression must be \"whitespace\", \"yui\" or false")]
    InvalidCompression { value: String },

    /// Optimization level outside 0..=2
    #[error("invalid optimization level '{value}': optimization_level must be 0, 1, 2 or false")]
    InvalidOptimizationLevel { value: String },

    /// The same source is mapped twice
    #[error("duplicate source '{source_path}' in file mappings")]
    DuplicateSource { source_path: PathBuf },

    /// Config file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Config file does not exist
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// A file selected for compilation cannot be read
    #[error("source path must be readable: \"{}\"", path.display())]
    SourceUnreadable { path: PathBuf },

    /// The external compiler exited unsuccessfully
    #[error("failed to compile \"{}\" using command: {command}. The error was: {output}", source_path.display())]
    CompilerProcess {
        source_path: PathBuf,
        command: String,
        output: String,
    },

    /// The external compiler ran past the configured bound and was killed
    #[error("compiling \"{}\" timed out after {}s using command: {command}", source_path.display(), timeout.as_secs_f64())]
    Timeout {
        source_path: PathBuf,
        command: String,
        timeout: Duration,
    },

    /// The external compiler could not be started at all
    #[error("failed to start compiler using command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// File watcher failure
    #[error("watch error: {message}")]
    Watch { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more files in a run failed
    #[error("{failed} of {total} file(s) failed to compile:\n{details}")]
    RunFailed {
        failed: usize,
        total: usize,
        details: String,
    },
}

impl BuildError {
    /// Whether this error belongs to configuration rather than a single file.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BuildError::InvalidMode { .. }
                | BuildError::InvalidCompression { .. }
                | BuildError::InvalidOptimizationLevel { .. }
                | BuildError::DuplicateSource { .. }
                | BuildError::InvalidConfig { .. }
                | BuildError::ConfigNotFound { .. }
        )
    }

    /// Stable machine-readable code used in JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::InvalidMode { .. }
            | BuildError::InvalidCompression { .. }
            | BuildError::InvalidOptimizationLevel { .. }
            | BuildError::DuplicateSource { .. }
            | BuildError::InvalidConfig { .. }
            | BuildError::ConfigNotFound { .. } => "configuration",
            BuildError::SourceUnreadable { .. } => "source_unreadable",
            BuildError::CompilerProcess { .. } => "compiler_process",
            BuildError::Timeout { .. } => "timeout",
            BuildError::Spawn { .. } => "spawn",
            BuildError::Watch { .. } => "watch",
            BuildError::Io(_) => "io",
            BuildError::RunFailed { .. } => "run_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_compression() {
        let err = BuildError::InvalidCompression {
            value: "gzip".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid compression 'gzip': compression must be \"whitespace\", \"yui\" or false"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_error_display_source_unreadable() {
        let err = BuildError::SourceUnreadable {
            path: PathBuf::from("web/less/site.less"),
        };
        assert_eq!(
            err.to_string(),
            "source path must be readable: \"web/less/site.less\""
        );
        assert!(!err.is_configuration());
        assert_eq!(err.code(), "source_unreadable");
    }

    #[test]
    fn test_error_display_compiler_process() {
        let err = BuildError::CompilerProcess {
            source_path: PathBuf::from("a.less"),
            command: "\"lessc\" \"a.less\" \"a.css\"".to_string(),
            output: "ParseError".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile \"a.less\" using command: \"lessc\" \"a.less\" \"a.css\". The error was: ParseError"
        );
    }
}
