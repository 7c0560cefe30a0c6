use lessbuild::{Staleness, StatusEntry};
use serde_json::json;

use crate::ui::theme::{dim, Icon};

pub fn render_status_entry(entry: &StatusEntry, supports_color: bool, supports_unicode: bool) -> String {
    let icon = match entry.staleness {
        Staleness::Deferred => Icon::Arrow,
        ref s if s.is_stale() => Icon::Progress,
        _ => Icon::Success,
    };
    format!(
        "{} {} -> {} {}",
        icon.colored(supports_color, supports_unicode),
        entry.mapping.source.display(),
        entry.mapping.destination.display(),
        dim(&format!("({})", entry.staleness.describe()), supports_color)
    )
}

pub fn render_status_summary(entries: &[StatusEntry]) -> String {
    let stale = entries.iter().filter(|e| e.staleness.is_stale()).count();
    format!("\n{} of {} stylesheets need compiling\n", stale, entries.len())
}

pub fn status_event(entry: &StatusEntry) -> serde_json::Value {
    json!({
        "event": "status",
        "source": entry.mapping.source.display().to_string(),
        "destination": entry.mapping.destination.display().to_string(),
        "stale": entry.staleness.is_stale(),
        "reason": entry.staleness.describe(),
    })
}
