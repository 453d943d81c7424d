//! pcsync CLI - Two-way synchronization with pCloud
//!
//! Provides commands for:
//! - Synchronizing a local folder with its pCloud mirror
//! - Validating a local tree against a remote tree by content hash
//! - Generating shell completions

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pcsync_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand, sync::SyncCommand, validate::ValidateCommand, CliContext,
};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "pcsync", version, about = "Two-way folder synchronization with pCloud")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize a local folder with pCloud
    Sync(SyncCommand),
    /// Compare a local tree with a remote tree by content hash
    Validate(ValidateCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    /// Explicit `--config` must load; the default location may be absent
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(Config::load_or_default(&Config::default_path())),
        }
    }

    /// `RUST_LOG` wins, then `-v`, then `--quiet`, then the configured level
    fn log_filter(&self, config: &Config) -> EnvFilter {
        let level = match (self.verbose, self.quiet) {
            (0, true) => "warn",
            (0, false) => config.logging.level.as_str(),
            (1, _) => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn init_tracing(filter: EnvFilter, json: bool) {
    // stdout carries command output; logs go to stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format();
    let formatter = get_formatter(format, cli.quiet);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            formatter.error(&problem.to_string());
        }
        return ExitCode::FAILURE;
    }

    init_tracing(cli.log_filter(&config), cli.json);

    let ctx = CliContext::new(format, config, cli.quiet);
    let result = match &cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Validate(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    };

    result.unwrap_or_else(|e| {
        formatter.error(&format!("{e:#}"));
        ExitCode::FAILURE
    })
}
