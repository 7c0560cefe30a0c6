//! Import scanner for LESS sources
//!
//! Textual, permissive extraction of `@import` targets. This is not a LESS
//! parser: malformed directives are ignored and comments are not stripped.

use std::sync::OnceLock;

use regex::Regex;

/// `@import`, optional LESS import options such as `(reference)`, then a
/// quoted target.
const IMPORT_PATTERN: &str = r#"(?i)@import\s*(?:\([^)]*\)\s*)?(?:"([^"\r\n]+)"|'([^'\r\n]+)')"#;

fn import_regex() -> &'static Regex {
    static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
    IMPORT_RE.get_or_init(|| Regex::new(IMPORT_PATTERN).expect("import pattern is valid"))
}

/// Extract import targets from LESS source text.
///
/// Targets are returned unquoted, in document order, duplicates included.
pub fn scan_imports(content: &str) -> Vec<String> {
    import_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
