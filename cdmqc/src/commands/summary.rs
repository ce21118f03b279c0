// cdmqc/src/commands/summary.rs
//
// USE CASE: demographic summary (Table IA) and patient pools (Table IB).

use std::path::Path;

use cdmqc_core::application::ReportContext;
use cdmqc_core::application::sections::{cohorts, demographics};
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::config::load_config;
use cdmqc_core::infrastructure::sql::jinja::SqlRenderer;

use super::parse_date_or_today;
use crate::render::print_report;

pub async fn execute(schema: String, reference: Option<String>) -> anyhow::Result<()> {
    let config = load_config(Path::new("."))?;
    let connector = DuckDBConnector::new(&config.db_path)?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let reference = parse_date_or_today(reference.as_deref())?;

    println!("🧾 Population summary of '{schema}' (reference {reference})");

    print_report(&demographics::demographic_summary(&ctx, &schema).await?);
    print_report(&cohorts::patient_pools(&ctx, &schema, reference).await?);

    Ok(())
}
