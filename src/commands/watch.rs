use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use lessbuild::watcher::{watch, WatchEvent, WatchOptions};
use lessbuild::Config;

use crate::ui::context::UiContext;
use crate::ui::views::watch::{render_watch_event, render_watch_header};

pub fn cmd_watch(config: Config, ui: &UiContext) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !ui.json {
        print!(
            "{}",
            render_watch_header(
                &config.options.base_path.display().to_string(),
                config.mode.as_str(),
                ui.color,
                ui.unicode
            )
        );
    }

    let json = ui.json;
    let color = ui.color;
    let unicode = ui.unicode;

    watch(WatchOptions { config }, running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered = render_watch_event(&timestamp, &event, color, unicode);

        match event {
            WatchEvent::Error { .. } | WatchEvent::FileFailed { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })?;

    Ok(())
}
