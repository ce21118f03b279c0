// cdmqc/src/commands/persistence.rs
//
// USE CASE: compare two refresh snapshots (checks 4.01 - 4.03).

use std::path::Path;

use cdmqc_core::application::ReportContext;
use cdmqc_core::application::sections::persistence;
use cdmqc_core::domain::dates::years_before;
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::config::load_config;
use cdmqc_core::infrastructure::sql::jinja::SqlRenderer;

use super::parse_date_or_today;
use crate::render::print_report;

pub async fn execute(
    previous: String,
    current: String,
    cutoff: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config(Path::new("."))?;
    let connector = DuckDBConnector::new(&config.db_path)?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let cutoff = parse_date_or_today(cutoff.as_deref())?;
    let window_start = years_before(cutoff, config.lookback_years);

    println!(
        "🔁 Comparing '{previous}' (previous) to '{current}' (current), window from {window_start}"
    );

    print_report(&persistence::table_drift(&ctx, &previous, &current, window_start).await?);
    print_report(&persistence::encounter_drift(&ctx, &previous, &current, window_start).await?);
    print_report(&persistence::code_drift(&ctx, &previous, &current, window_start).await?);

    Ok(())
}
