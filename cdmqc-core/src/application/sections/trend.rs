// cdmqc-core/src/application/sections/trend.rs
//
// Record-volume trend for one table, bucketed by year, month or day on the
// table's temporal column. Bucket keys are emitted as text (%Y, %Y-%m,
// %Y-%m-%d) so lexicographic and chronological order coincide.

use chrono::NaiveDate;
use serde_json::json;

use super::{ReportContext, date_param};
use crate::domain::catalog::lookup;
use crate::domain::dates::Granularity;
use crate::domain::error::DomainError;
use crate::domain::report::{Cell, ReportTable};
use crate::error::CdmqcError;
use crate::infrastructure::sql::templates;

pub async fn record_trend(
    ctx: &ReportContext<'_>,
    schema: &str,
    table_name: &str,
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    if start > end {
        return Err(DomainError::InvalidDateRange { start, end }.into());
    }
    let def =
        lookup(table_name).ok_or_else(|| DomainError::TableNotFound(table_name.to_string()))?;
    let temporal = def
        .temporal_column
        .ok_or_else(|| DomainError::NoTemporalColumn(def.name.to_string()))?;

    // Schema validation happens in tables_in.
    let present = ctx.tables_in(schema).await?;

    let with_patients = def.patient_id_column.is_some();
    let columns: &[&str] = if with_patients {
        &["Period", "Records", "Patients"]
    } else {
        &["Period", "Records"]
    };
    let mut table = ReportTable::new(
        format!("Trend - {} by {:?}", def.name, granularity),
        format!("Record volume of {} bucketed on {temporal}.", def.name),
        columns,
    );

    if !present.contains(def.name) {
        return Ok(table);
    }

    let records = ctx
        .fetch(
            templates::TREND,
            &json!({
                "schema": schema,
                "table": def.name,
                "temporal": temporal,
                "patient_column": def.patient_id_column,
                "bucket_format": granularity.bucket_format(),
            }),
            &[date_param(start), date_param(end)],
        )
        .await?;

    for record in records {
        let mut row = vec![
            Cell::plain(record.text("bucket").unwrap_or("")),
            Cell::plain(record.count("records").to_string()),
        ];
        if with_patients {
            row.push(Cell::plain(record.count("patients").to_string()));
        }
        table.push_row(row);
    }

    Ok(table)
}
