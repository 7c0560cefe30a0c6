//! Configuration module for lessbuild
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (LESSBUILD_*)
//! 3. Project config (lessbuild.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{with_env_overrides, with_overrides_from, ConfigWarning};
pub use types::{
    ClientOptions, CompilationOptions, Compression, Config, FileMapping, FileMappings, Mode,
    OptimizationLevel, OutputConfig, RawCompilerConfig, RawConfig, Toggle, Verbosity,
    DEFAULT_COMPILER, DEFAULT_SCRIPT_URL, DEFAULT_TIMEOUT_SECS,
};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "lessbuild.toml";
