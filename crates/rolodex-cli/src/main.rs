mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, ingest, scan, show, stats, Context};
use crate::error::{exit_code_for, report_error};
use rolodex_config as config;
use rolodex_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "rolodex", version, about = "Consolidate contact records into a deduplicated store")]
pub(crate) struct Cli {
    /// Store file to operate on
    #[arg(long, global = true, conflicts_with = "city")]
    store: Option<PathBuf>,
    /// Use the per-city store under the data directory
    #[arg(long, global = true)]
    city: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge a batch of candidate records into the store
    Ingest(ingest::IngestArgs),
    /// Aggregate counts over the store
    Stats,
    /// List stored records that look like the same entity
    Scan,
    /// Find stored records by name, phone or email
    Show(show::ShowArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        store: store_path,
        city,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let command = match command {
        Command::Completions(args) => return completions::emit(args),
        command => command,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let store_path =
        paths::resolve_store_path(store_path, app_config.data_dir.as_deref(), city.as_deref())
            .with_context(|| "resolve store path")?;
    debug!(path = %store_path.display(), "store path resolved");

    let store = Store::open(&store_path, app_config.engine_options())
        .with_context(|| format!("open store {}", store_path.display()))?;

    let mut ctx = Context {
        store,
        store_path,
        json,
    };

    match command {
        Command::Ingest(args) => ingest::ingest(&mut ctx, args),
        Command::Stats => stats::stats(&ctx),
        Command::Scan => scan::scan(&ctx),
        Command::Show(args) => show::show(&ctx, args),
        Command::Completions(args) => completions::emit(args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
