//! relasy - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use relasy::changelog::writer::DEFAULT_NAME;
use relasy::config::CONFIG_FILE;
use relasy::{Config, Relasy, RunContext};

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "RELASY_LOG";

/// Generate release notes and draft GitHub releases from labeled PRs.
#[derive(Parser, Debug)]
#[command(name = "relasy")]
#[command(about = "Generate release notes and draft GitHub releases from labeled PRs")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (relative to the workspace)
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bump the version and write the changelog to <name>.md
    Changelog {
        /// Document name, without extension
        #[arg(long, default_value = DEFAULT_NAME)]
        name: String,
    },

    /// Bump the version and publish the changelog as a draft release
    Release,

    /// Create or fix the repository labels for the configured taxonomy
    Labels {
        /// Print the planned actions without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    // Errors go to stdout; stderr carries the logs.
    if let Err(e) = run(cli).await {
        println!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = RunContext::from_env().context("Failed to build run context")?;
    let config_path = ctx.resolve(&cli.config);
    let config = Config::load(&config_path)?;
    let relasy = Relasy::load(&ctx, &config)?;

    match cli.command {
        Command::Changelog { name } => {
            let (notes, path) = relasy.write_changelog(&ctx.workspace, &name).await?;
            println!(
                "✓ {} -> {} ({} changes) written to {}",
                notes.previous_tag,
                notes.version,
                notes.changes.len(),
                path.display()
            );
        }
        Command::Release => {
            let notes = relasy.release().await?;
            println!(
                "✓ Draft release {} created with {} changes",
                notes.tag_name(),
                notes.changes.len()
            );
        }
        Command::Labels { dry_run: true } => {
            for action in relasy.plan_labels().await? {
                println!("{}", action);
            }
        }
        Command::Labels { dry_run: false } => {
            let report = relasy.sync_labels().await?;
            for name in &report.created {
                println!("[CREATED] {}", name);
            }
            for name in &report.updated {
                println!("[UPDATED] {}", name);
            }
            println!(
                "✓ Labels synchronized: {} created, {} updated, {} unchanged",
                report.created.len() + report.already_present.len(),
                report.updated.len(),
                report.unchanged
            );
        }
    }

    Ok(())
}
