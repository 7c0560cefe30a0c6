//! Configuration types
//!
//! Two layers: `Raw*` types mirror `lessbuild.toml` as written, and the
//! validated types (`Config`, `CompilationOptions`, ...) are what the rest of
//! the crate consumes. Every enumerated value is checked in
//! [`Config::from_raw`], so an illegal value fails the load instead of a
//! compile pass.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BuildError, BuildResult};

use super::loader::{self, ConfigWarning};

/// Default external compiler executable.
pub const DEFAULT_COMPILER: &str = "lessc";

/// Default bound on a single compiler invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default location of the client-side runtime.
pub const DEFAULT_SCRIPT_URL: &str = "js/less.min.js";

/// Compilation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sources are shipped to the browser and compiled by `less.js`
    Client,
    /// Sources are compiled ahead of time by an external `lessc`
    Server,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Client => "client",
            Mode::Server => "server",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(Mode::Client),
            "server" => Ok(Mode::Server),
            _ => Err(BuildError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Output compression method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    /// `--compress`
    Whitespace,
    /// `--yui-compress`
    Yui,
}

impl Compression {
    /// Parse a configured value. `aggressive` is accepted for `yui`.
    pub fn parse(value: &str) -> BuildResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "none" | "false" => Ok(Compression::None),
            "whitespace" => Ok(Compression::Whitespace),
            "yui" | "aggressive" => Ok(Compression::Yui),
            _ => Err(BuildError::InvalidCompression {
                value: value.to_string(),
            }),
        }
    }

    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Whitespace => Some("--compress"),
            Compression::Yui => Some("--yui-compress"),
        }
    }
}

/// Parser optimization level passed as `-O<level>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationLevel {
    O0,
    O1,
    O2,
}

impl OptimizationLevel {
    pub fn from_level(level: i64) -> BuildResult<Self> {
        match level {
            0 => Ok(OptimizationLevel::O0),
            1 => Ok(OptimizationLevel::O1),
            2 => Ok(OptimizationLevel::O2),
            _ => Err(BuildError::InvalidOptimizationLevel {
                value: level.to_string(),
            }),
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            OptimizationLevel::O0 => 0,
            OptimizationLevel::O1 => 1,
            OptimizationLevel::O2 => 2,
        }
    }

    pub fn flag(&self) -> String {
        format!("-O{}", self.level())
    }
}

/// Source → destination pairing, both relative to the base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl FileMapping {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Validated options shared by both compiler strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Directory that mapping paths are relative to
    pub base_path: PathBuf,
    /// Prefix for every url resource (`--rootpath`)
    pub root_path: Option<String>,
    /// Rewrite urls relative to the entry file (`--relative-urls`)
    pub relative_urls: bool,
    /// Force evaluation of imports (`--strict-imports`)
    pub strict_imports: bool,
    pub compression: Compression,
    /// `None` disables the `-O` flag
    pub optimization: Option<OptimizationLevel>,
    /// Skip staleness checks and always compile
    pub force: bool,
    pub compiler_path: PathBuf,
    /// Runtime used to launch the compiler, e.g. `node`
    pub interpreter: Option<PathBuf>,
    /// `None` lets the compiler run unbounded
    pub timeout: Option<Duration>,
    pub create_destination_dirs: bool,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            root_path: None,
            relative_urls: false,
            strict_imports: false,
            compression: Compression::None,
            optimization: None,
            force: false,
            compiler_path: PathBuf::from(DEFAULT_COMPILER),
            interpreter: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            create_destination_dirs: true,
        }
    }
}

impl CompilationOptions {
    /// Absolute-ish source path for a mapping.
    pub fn source_path(&self, mapping: &FileMapping) -> PathBuf {
        self.base_path.join(&mapping.source)
    }

    pub fn destination_path(&self, mapping: &FileMapping) -> PathBuf {
        self.base_path.join(&mapping.destination)
    }
}

/// Client-mode options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Where the page loads `less.js` from
    #[serde(default = "default_script_url")]
    pub script_url: String,

    /// `less.env`, e.g. "development"
    #[serde(default)]
    pub env: Option<String>,

    /// Write the stylesheet manifest here after a client run
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            script_url: default_script_url(),
            env: None,
            manifest: None,
        }
    }
}

fn default_script_url() -> String {
    DEFAULT_SCRIPT_URL.to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub options: CompilationOptions,
    pub client: ClientOptions,
    pub output: OutputConfig,
    pub files: Vec<FileMapping>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Client,
            options: CompilationOptions::default(),
            client: ClientOptions::default(),
            output: OutputConfig::default(),
            files: Vec::new(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> BuildResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> BuildResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Parse configuration text; relative paths resolve against `config_dir`.
    pub fn from_toml_str(content: &str, config_dir: &Path) -> BuildResult<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| BuildError::InvalidConfig {
            file: config_dir.join(super::DEFAULT_CONFIG_FILE),
            message: e.to_string(),
        })?;
        Self::from_raw(raw, config_dir)
    }

    /// Validate raw configuration.
    pub fn from_raw(raw: RawConfig, config_dir: &Path) -> BuildResult<Self> {
        let mode: Mode = raw.mode.parse()?;

        let compression = match raw.compiler.compression {
            Toggle::Flag(false) => Compression::None,
            Toggle::Flag(true) => {
                return Err(BuildError::InvalidCompression {
                    value: "true".to_string(),
                })
            }
            Toggle::Value(value) => Compression::parse(&value)?,
        };

        let optimization = match raw.compiler.optimization_level {
            Toggle::Flag(false) => None,
            Toggle::Flag(true) => {
                return Err(BuildError::InvalidOptimizationLevel {
                    value: "true".to_string(),
                })
            }
            Toggle::Value(level) => Some(OptimizationLevel::from_level(level)?),
        };

        let files = raw.files.into_mappings();
        let mut seen = HashSet::new();
        for mapping in &files {
            if !seen.insert(mapping.source.clone()) {
                return Err(BuildError::DuplicateSource {
                    source_path: mapping.source.clone(),
                });
            }
        }

        let base_path = match raw.compiler.base_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => config_dir.join(path),
            None => config_dir.to_path_buf(),
        };

        let timeout = match raw.compiler.timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        };

        let client = ClientOptions {
            manifest: raw.client.manifest.map(|p| {
                if p.is_absolute() {
                    p
                } else {
                    config_dir.join(p)
                }
            }),
            ..raw.client
        };

        Ok(Self {
            mode,
            options: CompilationOptions {
                base_path,
                root_path: raw.compiler.root_path,
                relative_urls: raw.compiler.relative_urls,
                strict_imports: raw.compiler.strict_imports,
                compression,
                optimization,
                force: raw.compiler.force,
                compiler_path: raw
                    .compiler
                    .compiler_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER)),
                interpreter: raw.compiler.interpreter,
                timeout,
                create_destination_dirs: raw.compiler.create_destination_dirs,
            },
            client,
            output: raw.output,
            files,
        })
    }
}

/// `lessbuild.toml` as written
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default)]
    pub compiler: RawCompilerConfig,

    #[serde(default)]
    pub client: ClientOptions,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub files: FileMappings,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            compiler: RawCompilerConfig::default(),
            client: ClientOptions::default(),
            output: OutputConfig::default(),
            files: FileMappings::default(),
        }
    }
}

fn default_mode() -> String {
    Mode::Client.as_str().to_string()
}

/// `[compiler]` section as written
#[derive(Debug, Clone, Deserialize)]
pub struct RawCompilerConfig {
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default)]
    pub relative_urls: bool,
    #[serde(default)]
    pub strict_imports: bool,
    #[serde(default)]
    pub compression: Toggle<String>,
    #[serde(default)]
    pub optimization_level: Toggle<i64>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub compiler_path: Option<PathBuf>,
    #[serde(default)]
    pub interpreter: Option<PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub create_destination_dirs: bool,
}

impl Default for RawCompilerConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            root_path: None,
            relative_urls: false,
            strict_imports: false,
            compression: Toggle::default(),
            optimization_level: Toggle::default(),
            force: false,
            compiler_path: None,
            interpreter: None,
            timeout_secs: None,
            create_destination_dirs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A value that may also be written as `false` to disable it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Flag(bool),
    Value(T),
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Toggle::Flag(false)
    }
}

/// File mappings in document order.
///
/// Supports the table form:
///   [files]
///   "less/site.less" = "css/site.css"
///
/// And the array form:
///   [[files]]
///   source = "less/site.less"
///   destination = "css/site.css"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMappings(Vec<FileMapping>);

impl FileMappings {
    pub fn into_mappings(self) -> Vec<FileMapping> {
        self.0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FileMappingsDe {
    List(Vec<FileMapping>),
    Table(OrderedTable),
}

impl<'de> Deserialize<'de> for FileMappings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FileMappingsDe::deserialize(deserializer)? {
            FileMappingsDe::List(mappings) => Ok(Self(mappings)),
            FileMappingsDe::Table(table) => Ok(Self(
                table
                    .0
                    .into_iter()
                    .map(|(source, destination)| FileMapping::new(source, destination))
                    .collect(),
            )),
        }
    }
}

/// String → string table that keeps entry order.
#[derive(Debug, Clone)]
struct OrderedTable(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedTableVisitor;

        impl<'de> Visitor<'de> for OrderedTableVisitor {
            type Value = OrderedTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of source = destination paths")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((source, destination)) = map.next_entry::<String, String>()? {
                    entries.push((source, destination));
                }
                Ok(OrderedTable(entries))
            }
        }

        deserializer.deserialize_map(OrderedTableVisitor)
    }
}
