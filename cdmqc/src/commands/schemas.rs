// cdmqc/src/commands/schemas.rs
//
// USE CASE: discover the CDM snapshot schemas in the warehouse.

use std::path::Path;

use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::config::load_config;
use cdmqc_core::ports::connector::Connector;

pub async fn execute() -> anyhow::Result<()> {
    let config = load_config(Path::new("."))?;
    let connector = DuckDBConnector::new(&config.db_path)?;

    let schemas = connector.list_schemas(&config.schema_prefix).await?;
    if schemas.is_empty() {
        println!(
            "🗂  No schema with prefix '{}' in {}",
            config.schema_prefix, config.db_path
        );
        return Ok(());
    }

    println!(
        "🗂  {} snapshot schema(s) with prefix '{}':",
        schemas.len(),
        config.schema_prefix
    );
    for schema in &schemas {
        let tables = connector.list_tables(schema).await?;
        println!("   ➜ {} ({} tables)", schema, tables.len());
    }

    Ok(())
}
