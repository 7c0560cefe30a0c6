use anyhow::Result;
use lessbuild::{Config, Orchestrator};

use crate::ui::context::UiContext;
use crate::ui::views::setup::render_directory_status;

pub fn cmd_setup(config: Config, ui: &UiContext) -> Result<()> {
    let statuses = Orchestrator::new(config).prepare();

    for status in &statuses {
        if ui.json {
            crate::ui::json::emit(serde_json::to_value(status)?)?;
        } else {
            println!("{}", render_directory_status(status, ui.color, ui.unicode));
        }
    }

    if statuses.iter().any(|s| !s.is_ok()) {
        std::process::exit(1);
    }

    Ok(())
}
