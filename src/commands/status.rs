use anyhow::Result;
use lessbuild::{Config, Mode, Orchestrator};

use crate::ui::context::UiContext;
use crate::ui::views::status::{render_status_entry, render_status_summary, status_event};

/// Report staleness for every mapping without compiling anything.
pub fn cmd_status(config: Config, ui: &UiContext) -> Result<()> {
    let mode = config.mode;
    let entries = Orchestrator::new(config).status();

    if ui.json {
        for entry in &entries {
            crate::ui::json::emit(status_event(entry))?;
        }
        return Ok(());
    }

    if mode == Mode::Client {
        println!("Client mode: stylesheets are compiled in the browser.");
    }
    for entry in &entries {
        println!("{}", render_status_entry(entry, ui.color, ui.unicode));
    }
    print!("{}", render_status_summary(&entries));

    Ok(())
}
