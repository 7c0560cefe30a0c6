use lessbuild::WatchEvent;

use crate::ui::theme::Icon;

pub fn render_watch_header(base: &str, mode: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} lessbuild watch\n  Base: {}\n  Mode: {}\n  Press Ctrl+C to stop\n\n",
        Icon::Watch.colored(supports_color, supports_unicode),
        base,
        mode
    )
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = format!("[{}]", timestamp);

    match event {
        WatchEvent::Started { path } => format!(
            "{} {} Watching: {}\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode),
            path
        ),
        WatchEvent::FileChanged { path } => format!(
            "{} {} Changed: {}\n",
            prefix,
            Icon::Arrow.colored(supports_color, supports_unicode),
            path
        ),
        WatchEvent::RunStarted => format!(
            "{} {} Compiling...\n",
            prefix,
            Icon::Progress.colored(supports_color, supports_unicode)
        ),
        WatchEvent::RunComplete {
            compiled,
            skipped,
            failed,
        } => {
            let icon = if *failed > 0 {
                Icon::Warning
            } else {
                Icon::Success
            }
            .colored(supports_color, supports_unicode);

            if *failed > 0 {
                format!(
                    "{} {} {} compiled, {} skipped, {} failed\n",
                    prefix, icon, compiled, skipped, failed
                )
            } else {
                format!(
                    "{} {} {} compiled, {} skipped\n",
                    prefix, icon, compiled, skipped
                )
            }
        }
        WatchEvent::FileFailed { message, .. } => format!(
            "{} {} {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Error { message } => format!(
            "{} {} Error: {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Shutdown => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
    }
}
