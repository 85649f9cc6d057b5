mod bootstrap;

use anyhow::{Context, Result};
use traffic_core::settings::Settings;
use traffic_data::aggregator::TrafficAggregator;
use traffic_data::reader::{ingest_path, ingest_stdin};
use traffic_data::report::TrafficReport;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Traffic Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Format: {:?}, Duplicates: {:?}",
        settings.input.display(),
        settings.format,
        settings.duplicates
    );

    // Nothing is printed unless the whole input was ingested.
    let report = build_report(&settings)?;
    let rendered = report
        .render(settings.format)
        .context("Failed to render report")?;
    print!("{}", rendered);

    Ok(())
}

/// Ingest the configured source into a fresh aggregator and snapshot it.
fn build_report(settings: &Settings) -> Result<TrafficReport> {
    let mut aggregator = TrafficAggregator::with_policy(settings.duplicates);

    let summary = if settings.reads_stdin() {
        ingest_stdin(&mut aggregator)
    } else {
        ingest_path(&settings.input, &mut aggregator)
    }
    .with_context(|| format!("Failed to ingest {}", settings.input.display()))?;

    tracing::info!(
        "Ingested {} readings covering {} intervals and {} days",
        summary.readings,
        aggregator.interval_count(),
        aggregator.daily_totals().len()
    );

    Ok(TrafficReport::from_aggregator(&aggregator))
}
