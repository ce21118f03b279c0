// cdmqc/src/commands/checks.rs
//
// USE CASE: run the single-schema integrity checks (1.05 - 1.12).

use std::path::Path;

use cdmqc_core::application::ReportContext;
use cdmqc_core::application::sections::integrity;
use cdmqc_core::domain::dates::years_before;
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::config::load_config;
use cdmqc_core::infrastructure::sql::jinja::SqlRenderer;

use super::parse_date_or_today;
use crate::render::print_report;

pub async fn execute(schema: String, cutoff: Option<String>) -> anyhow::Result<()> {
    let config = load_config(Path::new("."))?;
    let connector = DuckDBConnector::new(&config.db_path)?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let cutoff = parse_date_or_today(cutoff.as_deref())?;
    let window_start = years_before(cutoff, config.lookback_years);

    println!(
        "🔎 Integrity checks on '{schema}' (cutoff {cutoff}, window from {window_start})"
    );

    print_report(&integrity::primary_keys(&ctx, &schema).await?);
    print_report(&integrity::orphan_patids(&ctx, &schema).await?);
    print_report(&integrity::orphan_encounters(&ctx, &schema).await?);
    print_report(&integrity::replication_errors(&ctx, &schema).await?);
    print_report(&integrity::multi_patient_encounters(&ctx, &schema, window_start).await?);
    print_report(&integrity::orphan_providers(&ctx, &schema).await?);

    Ok(())
}
