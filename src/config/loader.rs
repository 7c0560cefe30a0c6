//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, BuildResult};

use super::types::{Config, RawConfig, Verbosity};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
///
/// Environment overrides (`LESSBUILD_*`) are applied before validation, so
/// an illegal value from the environment fails the load the same way an
/// illegal value in the file does.
pub fn load_with_warnings(path: &Path) -> BuildResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BuildError::ConfigNotFound {
            path: path.to_path_buf(),
        },
        _ => BuildError::Io(e),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let raw: RawConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| BuildError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    let config_dir = config_dir(path);
    let config = Config::from_raw(with_env_overrides(raw), &config_dir)?;

    Ok((config, warnings))
}

/// Directory a config file's relative paths resolve against.
fn config_dir(path: &Path) -> PathBuf {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    dir.canonicalize().unwrap_or(dir)
}

/// Apply environment variable overrides (LESSBUILD_* prefix)
pub fn with_env_overrides(raw: RawConfig) -> RawConfig {
    with_overrides_from(raw, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn with_overrides_from(mut raw: RawConfig, lookup: impl Fn(&str) -> Option<String>) -> RawConfig {
    // LESSBUILD_MODE
    if let Some(mode) = lookup("LESSBUILD_MODE") {
        raw.mode = mode;
    }

    // LESSBUILD_FORCE
    if let Some(val) = lookup("LESSBUILD_FORCE") {
        raw.compiler.force = is_truthy(&val);
    }

    // LESSBUILD_COMPILER
    if let Some(compiler) = lookup("LESSBUILD_COMPILER") {
        if !compiler.trim().is_empty() {
            raw.compiler.compiler_path = Some(PathBuf::from(compiler));
        }
    }

    // LESSBUILD_VERBOSITY
    if let Some(verbosity) = lookup("LESSBUILD_VERBOSITY") {
        raw.output.verbosity = match verbosity.to_lowercase().as_str() {
            "quiet" => Verbosity::Quiet,
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
    }

    raw
}

fn is_truthy(val: &str) -> bool {
    !matches!(val.trim().to_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "mode",
        "compiler",
        "base_path",
        "root_path",
        "relative_urls",
        "strict_imports",
        "compression",
        "optimization_level",
        "force",
        "compiler_path",
        "interpreter",
        "timeout_secs",
        "create_destination_dirs",
        "client",
        "script_url",
        "env",
        "manifest",
        "output",
        "verbosity",
        "files",
        "source",
        "destination",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
