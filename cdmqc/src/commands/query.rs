// cdmqc/src/commands/query.rs
//
// USE CASE: execute a raw SQL query (ad-hoc) and print the result set.

use cdmqc_core::application::run_query;
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::ports::connector::SqlValue;

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

pub async fn execute(query: String, db_path: String) -> anyhow::Result<()> {
    let connector = DuckDBConnector::new(&db_path)?;
    let records = run_query(&connector, &query, &[]).await?;

    let Some(first) = records.first() else {
        println!("✅ Query OK, empty result set.");
        return Ok(());
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        first
            .fields()
            .iter()
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>(),
    );

    for record in &records {
        table.add_row(
            record
                .fields()
                .iter()
                .map(|(_, value)| display_value(value))
                .collect::<Vec<_>>(),
        );
    }

    println!("{table}");
    println!("✅ {} row(s).", records.len());

    Ok(())
}

fn display_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Text(s) => s.clone(),
    }
}
