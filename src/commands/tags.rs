use anyhow::Result;
use lessbuild::{ClientCompiler, Config};

use crate::ui::context::UiContext;

/// Print the `less.js` loader markup for the configured stylesheets.
pub fn cmd_tags(config: Config, ui: &UiContext) -> Result<()> {
    let manifest =
        ClientCompiler::new(config.client.clone()).manifest(&config.files, &config.options);

    if ui.json {
        println!("{}", serde_json::to_string(&manifest)?);
    } else {
        print!("{}", manifest.render_tags());
    }

    Ok(())
}
