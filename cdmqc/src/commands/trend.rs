// cdmqc/src/commands/trend.rs
//
// USE CASE: record-volume trend of one CDM table.

use std::path::Path;

use cdmqc_core::application::ReportContext;
use cdmqc_core::application::sections::trend;
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::config::load_config;
use cdmqc_core::infrastructure::sql::jinja::SqlRenderer;

use super::parse_date;
use crate::cli::TrendInterval;
use crate::render::print_report;

pub async fn execute(
    schema: String,
    table: String,
    interval: TrendInterval,
    start: String,
    end: String,
) -> anyhow::Result<()> {
    let config = load_config(Path::new("."))?;
    let connector = DuckDBConnector::new(&config.db_path)?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let start = parse_date(&start)?;
    let end = parse_date(&end)?;

    let report =
        trend::record_trend(&ctx, &schema, &table, interval.into(), start, end).await?;
    print_report(&report);

    Ok(())
}
