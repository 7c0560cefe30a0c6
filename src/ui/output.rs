use lessbuild::config::ConfigWarning;
use lessbuild::BuildError;
use serde_json::json;

use crate::ui::context::UiContext;
use crate::ui::theme::Icon;

pub fn print_config_warnings(warnings: &[ConfigWarning], ui: &UiContext) {
    for w in warnings {
        if ui.json {
            let _ = crate::ui::json::emit(json!({
                "event": "warning",
                "kind": "unknown_config_key",
                "key": w.key,
                "file": w.file.display().to_string(),
                "line": w.line,
                "suggestion": w.suggestion,
            }));
            continue;
        }

        eprintln!("{}", render_config_warning(w, ui.color, ui.unicode));
    }
}

pub fn render_config_warning(w: &ConfigWarning, supports_color: bool, supports_unicode: bool) -> String {
    let icon = Icon::Warning.colored(supports_color, supports_unicode);
    let location = match w.line {
        Some(line) => format!("{}:{}", w.file.display(), line),
        None => w.file.display().to_string(),
    };

    let mut out = format!("{} Unknown config key '{}' in {}", icon, w.key, location);
    if let Some(suggestion) = &w.suggestion {
        out.push_str(&format!("\n   Did you mean '{}'?", suggestion));
    }
    out
}

/// Report an error that stops the command.
pub fn print_error(err: &anyhow::Error, ui: &UiContext) {
    let code = err
        .downcast_ref::<BuildError>()
        .map(BuildError::code)
        .unwrap_or("error");

    if ui.json {
        let _ = crate::ui::json::emit(json!({
            "event": "error",
            "code": code,
            "message": format!("{:#}", err),
        }));
        return;
    }

    eprintln!(
        "{} Error: {:#}",
        Icon::Error.colored(ui.color, ui.unicode),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_warning_with_line_and_suggestion() {
        let w = ConfigWarning {
            key: "compresion".to_string(),
            file: PathBuf::from("lessbuild.toml"),
            line: Some(4),
            suggestion: Some("compression".to_string()),
        };
        assert_eq!(
            render_config_warning(&w, false, false),
            "[WARN] Unknown config key 'compresion' in lessbuild.toml:4\n   Did you mean 'compression'?"
        );
    }

    #[test]
    fn renders_warning_without_line() {
        let w = ConfigWarning {
            key: "zzz".to_string(),
            file: PathBuf::from("lessbuild.toml"),
            line: None,
            suggestion: None,
        };
        assert_eq!(
            render_config_warning(&w, false, true),
            "⚠ Unknown config key 'zzz' in lessbuild.toml"
        );
    }
}
