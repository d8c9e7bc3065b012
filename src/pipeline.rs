//! Pipeline orchestration: staging, processing and reporting for one archive.

use chrono::DateTime;
use tracing::info;

use crate::aggregator::Aggregator;
use crate::cache::{GateOutcome, GateState, StalenessGate};
use crate::config::AppConfig;
use crate::error::Result;
use crate::file_writer::write_canonical_tables;
use crate::identity::IdentityResolver;
use crate::logging::{file_progress, scan_spinner, OperationTimer};
use crate::metrics::PipelineMetrics;
use crate::models::{CanonicalTables, FragmentOutcome, FragmentRef};
use crate::normalizer::process_fragment;
use crate::report::{run_send_receive, SEND_RECEIVE_FILE};
use crate::scanner::ConversationScanner;
use crate::stager::stage;

/// Scanner configured from `config`
#[must_use]
pub fn scanner_for(config: &AppConfig) -> ConversationScanner {
    ConversationScanner::new(config.raw_root())
        .with_extension(config.pipeline.fragment_extension.clone())
        .with_max_separators(config.pipeline.max_path_separators)
}

/// Resolver configured from `config`
#[must_use]
pub fn resolver_for(config: &AppConfig) -> IdentityResolver {
    IdentityResolver::with_placeholder(
        config.archive.owner_name.clone(),
        config.pipeline.placeholder_name.clone(),
    )
}

/// Build the canonical tables in memory.
///
/// Fragments are processed one at a time in discovery order; the first
/// unreadable fragment aborts the run.
pub fn process_data(
    scanner: &ConversationScanner,
    resolver: &IdentityResolver,
    show_progress: bool,
) -> Result<(CanonicalTables, PipelineMetrics)> {
    let timer = OperationTimer::new("process_data");

    info!("Gathering message files...");
    let spinner = scan_spinner("Gathering message files", show_progress);
    let fragments = scanner
        .scan()?
        .inspect(|_| spinner.inc(1))
        .collect::<Result<Vec<FragmentRef>>>()?;
    spinner.finish_and_clear();
    info!(files = fragments.len(), "Found message files");

    info!("Filtering messages and building tables...");
    let progress = file_progress(fragments.len() as u64, "Normalizing", show_progress);

    let (aggregator, metrics) = fragments.iter().try_fold(
        (Aggregator::new(), PipelineMetrics::default()),
        |(aggregator, mut metrics), fragment| -> Result<_> {
            let outcome = process_fragment(fragment, resolver)?;
            metrics.record_fragment(&outcome);
            progress.inc(1);

            let aggregator = match outcome {
                FragmentOutcome::Included(partial) => aggregator.fold(partial),
                FragmentOutcome::Skipped(_) => aggregator,
            };
            Ok((aggregator, metrics))
        },
    )?;
    progress.finish_and_clear();

    let tables = aggregator.finish();
    info!(
        "Processed {} contacts and {} messages",
        tables.contacts.len(),
        tables.messages.len()
    );
    log_time_span(&tables);
    metrics.log_summary();
    timer.finish();

    Ok((tables, metrics))
}

fn log_time_span(tables: &CanonicalTables) {
    let first = tables.messages.first().and_then(|m| DateTime::from_timestamp_millis(m.timestamp_ms));
    let last = tables.messages.last().and_then(|m| DateTime::from_timestamp_millis(m.timestamp_ms));
    if let (Some(first), Some(last)) = (first, last) {
        info!("Messages span {} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"));
    }
}

/// Extract the export zip if needed
pub fn run_staging(config: &AppConfig) -> Result<()> {
    stage(&config.zip_path(), &config.raw_root(), config.pipeline.debug)
}

/// Gate state of the canonical tables, without forcing
#[must_use]
pub fn processing_status(config: &AppConfig) -> GateState {
    StalenessGate::for_tables(&config.artifact_paths(), config.pipeline.debug).state()
}

/// Regenerate the canonical tables unless they are fresh
pub fn run_processing(config: &AppConfig) -> Result<GateOutcome> {
    let paths = config.artifact_paths();
    let gate = StalenessGate::for_tables(&paths, config.pipeline.debug);
    let scanner = scanner_for(config);
    let resolver = resolver_for(config);

    let outcome = gate.run(|| {
        let (tables, _) = process_data(&scanner, &resolver, config.pipeline.show_progress)?;
        write_canonical_tables(&tables, &paths)
    })?;

    info!("Processing success");
    Ok(outcome)
}

/// Regenerate the send/receive report unless it is fresh
pub fn run_report(config: &AppConfig) -> Result<GateOutcome> {
    run_send_receive(
        &config.artifact_paths().messages,
        &config.output_root().join(SEND_RECEIVE_FILE),
        config.stats.min_total_chars,
        config.pipeline.debug,
    )
}

/// Stage, process and report, in that order
pub fn run_analysis(config: &AppConfig) -> Result<()> {
    info!("Unzipping data");
    run_staging(config)?;

    info!("Processing data");
    run_processing(config)?;

    info!("Generating statistics");
    run_report(config)?;

    Ok(())
}
