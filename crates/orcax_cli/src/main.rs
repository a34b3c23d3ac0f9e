//! `orcax` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `ORCAX_*` environment variables.
//! - Start the budget app against the configured remote and local cache.
//! - Dispatch to report/export/sync commands.

use clap::{Parser, Subcommand};
use orcax_core::config::{DEFAULT_CACHE_DB_FILE_NAME, DEFAULT_REMOTE_URL};
use orcax_core::seed::DEFAULT_ANNUAL_BUDGET;
use orcax_core::sync::debounce::DEFAULT_SAVE_DEBOUNCE_MS;
use orcax_core::{
    AppConfig, BudgetApp, DisabledRemote, HttpRemoteStore, LocalCache, RemoteStore,
    SqliteSnapshotCache,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod commands;
mod error;

use error::{CliError, CliResult};

/// Orcax CLI application
#[derive(Parser)]
#[command(name = "orcax")]
#[command(about = "Orcax - annual project budget and team allocation planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Remote snapshot endpoint; an empty value disables the remote tier
    #[arg(long, env = "ORCAX_REMOTE_URL", default_value = DEFAULT_REMOTE_URL)]
    remote_url: String,

    /// SQLite cache file
    #[arg(long, env = "ORCAX_CACHE_DB", default_value = DEFAULT_CACHE_DB_FILE_NAME)]
    cache_db: PathBuf,

    /// Annual budget the monthly limits are derived from
    #[arg(long, env = "ORCAX_ANNUAL_BUDGET", default_value_t = DEFAULT_ANNUAL_BUDGET)]
    annual_budget: f64,

    /// Quiet period between the last edit and the save, in milliseconds
    #[arg(long, env = "ORCAX_DEBOUNCE_MS", default_value_t = DEFAULT_SAVE_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Skip the remote tier entirely
    #[arg(long)]
    offline: bool,

    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Monthly cash flow, project ranking, and budget usage
    Report {
        /// Restrict the budget view to one month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Members allocated above 100% in any month
    Overloads,

    /// Print the loaded snapshot as JSON
    Export,

    /// Load, then write the snapshot to every tier
    Sync,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.log_dir.as_deref() {
        Some(dir) => orcax_core::init_logging(&cli.log_level, dir)?,
        None => orcax_core::init_stderr_logging(&cli.log_level)?,
    }

    let config = build_config(&cli)?;

    let remote: Box<dyn RemoteStore> = match config.remote_url.as_deref() {
        Some(url) => Box::new(HttpRemoteStore::new(url, config.request_timeout)?),
        None => Box::new(DisabledRemote),
    };
    let cache: Box<dyn LocalCache> = match SqliteSnapshotCache::open(&config.cache_db_path) {
        Ok(cache) => Box::new(cache),
        Err(err) => {
            log::warn!(
                "event=cache_open module=cli status=error path={} error={}",
                config.cache_db_path.display(),
                err
            );
            Box::new(SqliteSnapshotCache::open_in_memory().map_err(CliError::Cache)?)
        }
    };

    let (mut app, outcome) = BudgetApp::start(remote, cache, &config);
    eprintln!(
        "loaded from {} (mode={}, projects={}, members={})",
        outcome.source,
        outcome.mode,
        app.store().projects().len(),
        app.store().team().len()
    );

    match cli.command {
        Commands::Report { month } => commands::report(&app, month),
        Commands::Overloads => commands::overloads(&app),
        Commands::Export => commands::export(&app),
        Commands::Sync => commands::sync(&mut app),
    }
}

fn build_config(cli: &Cli) -> CliResult<AppConfig> {
    let remote_url = (!cli.offline).then_some(cli.remote_url.as_str());
    let config = AppConfig {
        cache_db_path: cli.cache_db.clone(),
        annual_budget: cli.annual_budget,
        debounce: Duration::from_millis(cli.debounce_ms),
        ..AppConfig::default()
    }
    .with_remote_url(remote_url);
    config.validate()?;
    Ok(config)
}
