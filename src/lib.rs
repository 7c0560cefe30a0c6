//! lessbuild - LESS stylesheet build tool
//!
//! lessbuild keeps compiled CSS in step with its LESS sources. In server mode
//! it runs an external `lessc` for every mapping whose output is older than
//! the source or any file the source transitively imports. In client mode it
//! leaves compilation to `less.js` in the browser and only describes what the
//! page has to load.

pub mod compiler;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod scanner;
pub mod setup;
pub mod staleness;
pub mod watcher;

// Re-exports for convenience
pub use compiler::{
    ClientCompiler, ClientManifest, CompileAction, CompileOutcome, CompilerStrategy, FileReport,
    RunReport, ServerCompiler, SkipReason,
};
pub use config::{CompilationOptions, Config, ConfigWarning, FileMapping, Mode};
pub use error::{BuildError, BuildResult};
pub use orchestrator::{Orchestrator, StatusEntry};
pub use process::{ProcessRunner, SystemRunner};
pub use scanner::scan_imports;
pub use staleness::{needs_recompilation, Staleness};
pub use watcher::{watch, WatchEvent, WatchOptions};
