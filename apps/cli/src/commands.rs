//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use inkpage_shared::{
    ConfigContainer, FileConfigContainer, InkpageError, config_schema, default_action_buttons,
    default_config, default_config_path,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// inkpage — note space configuration tooling.
#[derive(Parser)]
#[command(
    name = "inkpage",
    version,
    about = "Inspect and validate note space configuration.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the default configuration.
    Defaults,
    /// Print the configuration schema.
    Schema,
    /// Print the built-in action buttons.
    Buttons,
    /// Validate a configuration file and print the resolved configuration.
    Check {
        /// Config file (TOML or JSON). Defaults to ~/.inkpage/config.toml.
        path: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "inkpage=info,inkpage_shared=info",
        1 => "inkpage=debug,inkpage_shared=debug",
        _ => "inkpage=trace,inkpage_shared=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Defaults => print_json(&default_config()),
            ConfigAction::Schema => print_json(&config_schema()),
            ConfigAction::Buttons => print_json(&default_action_buttons()),
            ConfigAction::Check { path } => {
                let path = match path {
                    Some(path) => path,
                    None => default_config_path()?,
                };
                cmd_config_check(&path).await
            }
        },
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

async fn cmd_config_check(path: &Path) -> Result<()> {
    let mut container = FileConfigContainer::new(path)?;

    match container.load_config().await {
        Ok(()) => {
            info!(path = %path.display(), "configuration is valid");
            print_json(container.config())
        }
        Err(InkpageError::Validation {
            message,
            violations,
        }) => {
            for violation in &violations {
                eprintln!("  {violation}");
            }
            Err(eyre!("{} is invalid: {message}", path.display()))
        }
        Err(e) => Err(e.into()),
    }
}
