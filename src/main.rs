// src/main.rs

//! Schedule sync CLI.
//!
//! Runs one sync pass against the configured source and store; intended
//! to be invoked on a fixed cadence by cron or a systemd timer.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use schedule_sync::config::Config;
use schedule_sync::error::Result;
use schedule_sync::gateway::{HttpSource, HttpStore};
use schedule_sync::sync::run_sync;

#[derive(Parser, Debug)]
#[command(
    name = "schedule-sync",
    version,
    about = "Reconciles scraped university schedules against a store of record"
)]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one sync pass over all groups
    Sync {
        /// Override the configured chunk size
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Validate => {
            config.validate()?;
            log::info!("Configuration is valid");
        }
        Command::Sync { chunk_size } => {
            config.validate()?;
            let source = Arc::new(HttpSource::new(&config.source)?);
            let store = Arc::new(HttpStore::new(&config.store)?);
            let chunk_size = chunk_size.unwrap_or(config.sync.chunk_size);

            let report = run_sync(source, store, chunk_size).await?;

            for group in report.groups.iter().filter(|g| !g.is_ok()) {
                log::error!(
                    "{} ({}): {}",
                    group.group_name,
                    group.group_ext_id,
                    group.error.as_deref().unwrap_or("unknown error")
                );
            }
            let totals = report.totals();
            log::info!(
                "{} groups ok, {} failed; {} added, {} changed, {} deleted, {} unchanged",
                report.succeeded(),
                report.failed(),
                totals.added,
                totals.changed,
                totals.deleted,
                totals.unchanged
            );
        }
    }

    Ok(())
}
