// cdmqc-core/src/application/sections/demographics.rs
//
// Table IA — the demographic summary. The row catalogue is assembled into a
// single UNION ALL statement so every count reads the same snapshot, then
// the two percentage denominators are fetched separately and applied in the
// domain. The denominator switch (all patients vs patients with an encounter
// after December 2011) is carried per row by the catalogue.

use serde_json::json;

use super::ReportContext;
use crate::domain::catalog::demographics::{
    AGE_EXPR, DEMOGRAPHIC_ROWS, RACE_ENCOUNTER_SINCE, RowDenominator, RowKind,
};
use crate::domain::quality::metrics::{format_percentage, share_of_total};
use crate::domain::report::{Cell, ReportTable};
use crate::error::CdmqcError;
use crate::infrastructure::sql::{quote_literal, templates};
use crate::ports::connector::{Record, SqlValue};

/// Builds the UNION ALL template over the row catalogue. Row labels are
/// embedded as escaped literals; predicates come from the static catalogue
/// and may reference `{{ schema }}` themselves.
fn summary_template() -> String {
    let mut parts = Vec::with_capacity(DEMOGRAPHIC_ROWS.len());
    for (order, row) in DEMOGRAPHIC_ROWS.iter().enumerate() {
        let n_expr = match row.kind {
            RowKind::Header => "CAST(NULL AS BIGINT)".to_string(),
            RowKind::PatientCount => {
                "(SELECT COUNT(*) FROM {{ schema }}.DEMOGRAPHIC)".to_string()
            }
            RowKind::MeanAge => format!(
                "(SELECT CAST(AVG({AGE_EXPR}) AS BIGINT) FROM {{{{ schema }}}}.DEMOGRAPHIC)"
            ),
            RowKind::MedianAge => format!(
                "(SELECT CAST(quantile_cont({AGE_EXPR}, 0.5) AS BIGINT) FROM {{{{ schema }}}}.DEMOGRAPHIC)"
            ),
            RowKind::Count(predicate) => format!(
                "(SELECT COUNT(*) FROM {{{{ schema }}}}.DEMOGRAPHIC WHERE {predicate})"
            ),
        };
        parts.push(format!(
            "SELECT {} AS category, {} AS group_name, {} AS n, {} AS row_order",
            quote_literal(row.category),
            quote_literal(row.group_name),
            n_expr,
            order
        ));
    }
    format!("{}\nORDER BY row_order", parts.join("\nUNION ALL\n"))
}

/// Table IA — demographic summary of one schema.
pub async fn demographic_summary(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;

    let mut table = ReportTable::new(
        "Table IA - Demographic summary",
        "Patient counts by age, ethnicity, sex, race, gender identity and sexual orientation.",
        &["Category", "Group", "N", "Percentage"],
    );

    if !present.contains("DEMOGRAPHIC") {
        return Ok(table);
    }
    let has_encounter = present.contains("ENCOUNTER");

    let context = json!({ "schema": schema });
    let records = ctx.fetch(&summary_template(), &context, &[]).await?;

    let all_patients = ctx
        .fetch_one(templates::PATIENT_TOTAL, &context, &[])
        .await?
        .count("n");
    let encounter_patients = if has_encounter {
        ctx.fetch_one(
            templates::ENCOUNTER_PATIENT_TOTAL,
            &context,
            &[SqlValue::Text(RACE_ENCOUNTER_SINCE.to_string())],
        )
        .await?
        .count("n")
    } else {
        0
    };

    for (row, record) in DEMOGRAPHIC_ROWS.iter().zip(records.iter()) {
        table.push_row(build_row(row, record, all_patients, encounter_patients));
    }

    Ok(table)
}

fn build_row(
    row: &crate::domain::catalog::demographics::DemographicRow,
    record: &Record,
    all_patients: i64,
    encounter_patients: i64,
) -> Vec<Cell> {
    let n = record.get("n").and_then(SqlValue::as_i64);

    let n_cell = match n {
        Some(v) => Cell::plain(v.to_string()),
        None => Cell::plain(""),
    };
    let pct_cell = match (row.denominator, n) {
        (RowDenominator::NoPercent, _) | (_, None) => Cell::plain(""),
        (RowDenominator::AllPatients, Some(v)) => {
            Cell::plain(format_percentage(share_of_total(v, all_patients, 1), 1))
        }
        (RowDenominator::EncounterPatients, Some(v)) => Cell::plain(format_percentage(
            share_of_total(v, encounter_patients, 1),
            1,
        )),
    };

    let category_cell = if matches!(row.kind, RowKind::Header) {
        Cell::label(row.category)
    } else {
        Cell::plain(row.category)
    };

    vec![category_cell, Cell::plain(row.group_name), n_cell, pct_cell]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_one_branch_per_row() {
        let template = summary_template();
        assert_eq!(
            template.matches("UNION ALL").count(),
            DEMOGRAPHIC_ROWS.len() - 1
        );
        assert!(template.ends_with("ORDER BY row_order"));
    }

    #[test]
    fn test_template_keeps_schema_placeholder() {
        // After format!-assembly the jinja placeholder must survive intact
        // for the renderer.
        let template = summary_template();
        assert!(template.contains("{{ schema }}.DEMOGRAPHIC"));
        assert!(!template.contains("{{{{"));
    }
}
