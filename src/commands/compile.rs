use anyhow::Result;
use lessbuild::{Config, Orchestrator};

use crate::ui::context::UiContext;
use crate::ui::views::compile::{complete_event, file_event, render_file_report, render_summary};

pub fn cmd_compile(mut config: Config, force: bool, ui: &UiContext) -> Result<()> {
    if force {
        config.options.force = true;
    }

    let report = Orchestrator::new(config).run()?;

    if ui.json {
        for file in &report.files {
            crate::ui::json::emit(file_event(file))?;
        }
        crate::ui::json::emit(complete_event(&report))?;
    } else {
        for file in &report.files {
            if file.outcome.is_failed() {
                eprintln!("{}", render_file_report(file, ui.color, ui.unicode));
            } else {
                println!("{}", render_file_report(file, ui.color, ui.unicode));
            }
        }
        print!("{}", render_summary(&report, ui.color, ui.unicode));
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
