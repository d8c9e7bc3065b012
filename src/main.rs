use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use messenger_analysis::cache::GateState;
use messenger_analysis::config::AppConfig;
use messenger_analysis::logging::init_logging;
use messenger_analysis::pipeline::{processing_status, run_analysis, run_processing};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archive identifier (the export zip's file name without `.zip`)
    #[arg(short, long, global = true)]
    archive_id: Option<String>,

    /// Your display name exactly as it appears in the export
    #[arg(short, long, global = true)]
    owner: Option<String>,

    /// Force every stage to recompute
    #[arg(short, long, global = true)]
    debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unzip, process and compute statistics
    Run,
    /// Build the canonical contact and message tables only
    Process,
    /// Report whether the canonical tables would be reused
    Status,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| config.get_log_level());
    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let _guard = init_logging(Some(&level), log_file.as_deref(), config.log_format()?)?;

    info!("Starting the Messenger analysis for archive {}", config.archive.id);
    if config.pipeline.debug {
        warn!("Debugging... will force re-run all processing");
    }

    let result = match cli.command {
        Commands::Run => run_analysis(&config).map_err(anyhow::Error::from),
        Commands::Process => run_processing(&config)
            .map(|_| ())
            .map_err(anyhow::Error::from),
        Commands::Status => {
            report_status(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("{e:#}");
        error!("Critical error, exiting...");
    } else {
        info!("Messenger analysis complete");
    }
    result
}

/// Command-line flags win over every configuration source
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(id) = &cli.archive_id {
        config.archive.id.clone_from(id);
    }
    if let Some(owner) = &cli.owner {
        config.archive.owner_name.clone_from(owner);
    }
    if cli.debug {
        config.pipeline.debug = true;
    }
    if cli.no_progress {
        config.pipeline.show_progress = false;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(path) = &cli.log_file {
        config.logging.file_path = Some(path.to_string_lossy().into_owned());
    }
}

fn report_status(config: &AppConfig) {
    let paths = config.artifact_paths();
    match processing_status(config) {
        GateState::Fresh => info!("Processed data is fresh at {}", paths.dir.display()),
        GateState::Stale(reason) => info!("Processed data is stale: {reason}"),
    }
}
