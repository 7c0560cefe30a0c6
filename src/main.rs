//! lessbuild CLI - LESS stylesheet build tool
//!
//! Usage: lessbuild [--config PATH] [--json] [-v...] [COMMAND]
//!
//! Commands:
//!   compile  Compile every stale stylesheet (default)
//!   status   Show which stylesheets are stale
//!   watch    Recompile on change
//!   setup    Create missing output folders
//!   tags     Print the less.js loader markup

mod cli;
mod commands;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lessbuild::config::{Config, Verbosity, DEFAULT_CONFIG_FILE};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use ui::context::UiContext;

fn main() {
    let cli = Cli::parse();
    let ui = UiContext::new(cli.json);

    if let Err(err) = run(cli, &ui) {
        ui::output::print_error(&err, &ui);
        std::process::exit(1);
    }
}

fn run(cli: Cli, ui: &UiContext) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let loaded = Config::load_with_warnings(&config_path);
    let configured = loaded
        .as_ref()
        .map(|(config, _)| config.output.verbosity)
        .unwrap_or_default();
    init_tracing(cli.verbose, configured);

    let (config, warnings) = loaded?;
    ui::output::print_config_warnings(&warnings, ui);

    match cli.command() {
        Commands::Compile { force } => commands::compile::cmd_compile(config, force, ui),
        Commands::Status => commands::status::cmd_status(config, ui),
        Commands::Watch => commands::watch::cmd_watch(config, ui),
        Commands::Setup => commands::setup::cmd_setup(config, ui),
        Commands::Tags => commands::tags::cmd_tags(config, ui),
    }
}

/// Log filter: `RUST_LOG` wins, then `-v`, then the configured verbosity.
fn default_directive(verbose: u8, configured: Verbosity) -> &'static str {
    match verbose {
        0 => match configured {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "lessbuild=info,warn",
            Verbosity::Debug => "lessbuild=debug,info",
        },
        1 => "lessbuild=info,warn",
        2 => "lessbuild=debug,info",
        _ => "lessbuild=trace,debug",
    }
}

fn init_tracing(verbose: u8, configured: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, configured)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
