mod report;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use warstatus::services::orchestrator::normalize_single;
use warstatus::services::{build_orchestrator, fetcher, Config, Orchestrator, Overrides};
use warstatus::types::{AggregateSnapshot, Endpoint};

/// Galactic war status aggregator
#[derive(Parser)]
#[command(name = "warstatus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override the upstream API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one snapshot (default)
    Snapshot {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the snapshot on a fixed interval until Ctrl-C
    Watch {
        /// Seconds between cycles (default: config poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize a saved endpoint response
    Inspect {
        /// Endpoint the payload came from (war, planets, dispatches, steam, ...)
        endpoint: Endpoint,

        /// Path to the saved JSON body
        file: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let overrides = Overrides {
            base_url: self.base_url,
            request_timeout_secs: self.timeout,
        };

        match self.command {
            // Works on a local file; needs no config
            Some(Commands::Inspect { endpoint, file }) => inspect(endpoint, &file),
            None => snapshot_once(&Config::load(&overrides)?, false).await,
            Some(Commands::Snapshot { json }) => {
                snapshot_once(&Config::load(&overrides)?, json).await
            }
            Some(Commands::Watch { interval, json }) => {
                let config = Config::load(&overrides)?;
                let every = interval
                    .map(|s| Duration::from_secs(s.max(1)))
                    .unwrap_or_else(|| config.poll_interval());
                watch(&config, every, json).await
            }
        }
    }
}

async fn snapshot_once(config: &Config, json: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let snapshot = orchestrator.snapshot().await?;
    print_snapshot(&snapshot, json)
}

async fn watch(config: &Config, every: Duration, json: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config)?;
    info!(interval_secs = every.as_secs(), "watching war status");
    watch_until(&orchestrator, every, tokio::signal::ctrl_c(), |snapshot| {
        print_snapshot(snapshot, json)
    })
    .await
}

/// Run a cycle on every tick until `shutdown` resolves, including mid-cycle
async fn watch_until<S, T, F>(
    orchestrator: &Orchestrator,
    every: Duration,
    shutdown: S,
    mut emit: F,
) -> anyhow::Result<()>
where
    S: Future<Output = T>,
    F: FnMut(&AggregateSnapshot) -> anyhow::Result<()>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }
        tokio::select! {
            result = orchestrator.snapshot() => match result {
                Ok(snapshot) => emit(&snapshot)?,
                // Retried on the next tick
                Err(e) => error!(error = %e, "failed to load war status"),
            },
            _ = &mut shutdown => break,
        }
    }

    info!("shutting down");
    Ok(())
}

fn inspect(endpoint: Endpoint, file: &Path) -> anyhow::Result<()> {
    let body = std::fs::read(file)?;
    let payload = fetcher::parse_body(endpoint, &body)?;
    let snapshot = normalize_single(endpoint, payload, chrono::Utc::now());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn print_snapshot(snapshot: &AggregateSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        print!("{}", report::render(snapshot));
    }
    Ok(())
}
