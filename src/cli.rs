use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lessbuild - keeps compiled CSS in step with its LESS sources
#[derive(Parser, Debug)]
#[command(name = "lessbuild")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'lessbuild' without a command to compile.")]
pub struct Cli {
    /// Path to the config file (default: ./lessbuild.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compile every stale stylesheet (default)
    Compile {
        /// Compile even when outputs are up to date
        #[arg(short, long)]
        force: bool,
    },

    /// Show which stylesheets are stale without compiling
    Status,

    /// Watch sources and recompile on change
    Watch,

    /// Create missing output folders
    Setup,

    /// Print the HTML that loads the stylesheets with less.js
    Tags,
}

impl Cli {
    /// The command to run, `compile` when none was given.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Compile { force: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_compile() {
        let cli = Cli::try_parse_from(["lessbuild"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.command(), Commands::Compile { force: false });
    }

    #[test]
    fn test_cli_parse_compile_force() {
        let cli = Cli::try_parse_from(["lessbuild", "compile", "--force"]).unwrap();
        assert_eq!(cli.command(), Commands::Compile { force: true });
    }

    #[test]
    fn test_cli_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["lessbuild", "status", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.command(), Commands::Status);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["lessbuild", "-vvv", "watch"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.command(), Commands::Watch);
    }

    #[test]
    fn test_cli_config_path() {
        let cli =
            Cli::try_parse_from(["lessbuild", "setup", "--config", "site/lessbuild.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site/lessbuild.toml")));
        assert_eq!(cli.command(), Commands::Setup);
    }

    #[test]
    fn test_cli_parse_tags() {
        let cli = Cli::try_parse_from(["lessbuild", "tags"]).unwrap();
        assert_eq!(cli.command(), Commands::Tags);
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["lessbuild", "deploy"]).is_err());
    }
}
