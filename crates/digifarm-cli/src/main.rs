use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use digifarm_application::DigiFarmApp;
use digifarm_core::config::DEFAULT_LOG_LEVEL;
use digifarm_infrastructure::{ConfigService, DigiFarmPaths, FilePreviewStore};

mod commands;
mod helper;
mod render;

use commands::{Flow, ReplLine, Shell, ShellEditor};
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "digifarm")]
#[command(about = "DigiFarm - crop disease detection and produce marketplace", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/digifarm/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "digifarm_application=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Seed for reproducible disease selection
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the effective configuration to the config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;

    init_tracing(cli.log_level.as_deref(), &config.logging.level);

    if let Some(Commands::Config { action }) = cli.command {
        match action {
            ConfigAction::Show => print!("{}", toml::to_string_pretty(&config)?),
            ConfigAction::Init => {
                config_service.save(&config)?;
                println!("Wrote {}", config_service.path().display());
            }
        }
        return Ok(());
    }

    let previews_dir = DigiFarmPaths::previews_dir()
        .unwrap_or_else(|_| std::env::temp_dir().join("digifarm-previews"));
    let previews = Arc::new(FilePreviewStore::new(&previews_dir)?);

    let mut app = DigiFarmApp::new(&config, previews);
    if let Some(seed) = cli.seed {
        app = app.with_seed(seed);
    }
    tracing::debug!(?app, "Application ready");

    run_repl(Shell::new(app)).await
}

/// `--log-level` wins over `RUST_LOG`, which wins over the config file.
fn init_tracing(flag: Option<&str>, configured: &str) {
    let filter = match flag {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(configured)),
    }
    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_repl(mut shell: Shell) -> Result<()> {
    let mut rl: ShellEditor = ShellEditor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== DigiFarm ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'login' to sign in, 'help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let prompt = shell.prompt().await;
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match ReplLine::try_parse_from(trimmed.split_whitespace()) {
                    Ok(parsed) => parsed.command,
                    Err(e) => {
                        let _ = e.print();
                        continue;
                    }
                };

                match shell.execute(command, &mut rl).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
