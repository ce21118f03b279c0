// cdmqc-core/src/application/sections/cohorts.rs
//
// Table IB — potential patient pools for recruitment. One CTE chain computes
// every pool against the same snapshot; the published rows then read one
// result column each. Pool percentages switch denominator: the top pools are
// shares of all patients, the narrowed pools are shares of the five-year
// face-to-face encounter pool.

use chrono::NaiveDate;
use serde_json::json;

use super::{ReportContext, date_param};
use crate::domain::catalog::checks::FACE_TO_FACE_TYPES;
use crate::domain::catalog::cohorts::{COHORT_ROWS, PoolDenominator};
use crate::domain::dates::years_before;
use crate::domain::quality::metrics::{format_percentage, share_of_total};
use crate::domain::report::{Cell, ReportTable};
use crate::error::CdmqcError;
use crate::infrastructure::sql::{quote_literal, templates};

/// Tables the pool query joins across. All of them must exist in the schema
/// for the CTE chain to run.
const REQUIRED_TABLES: &[&str] = &[
    "DEMOGRAPHIC",
    "ENCOUNTER",
    "DIAGNOSIS",
    "PROCEDURES",
    "VITAL",
    "PRESCRIBING",
    "MED_ADMIN",
    "LAB_RESULT_CM",
];

/// Table IB — patient pools of one schema, windows anchored at `reference`.
pub async fn patient_pools(
    ctx: &ReportContext<'_>,
    schema: &str,
    reference: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;

    let mut table = ReportTable::new(
        "Table IB - Potential patient pools",
        "Progressively narrowed patient cohorts for study recruitment.",
        &["Metric", "Description", "N", "Percentage"],
    );

    if REQUIRED_TABLES.iter().any(|t| !present.contains(*t)) {
        return Ok(table);
    }

    let five_years = date_param(years_before(reference, 5));
    let one_year = date_param(years_before(reference, 1));
    let ftf_list = FACE_TO_FACE_TYPES
        .iter()
        .map(|t| quote_literal(t))
        .collect::<Vec<_>>()
        .join(",");

    // Placeholder order follows the CTE chain: the one-year pool is second,
    // every other window is the five-year start.
    let params = [
        five_years.clone(),
        one_year,
        five_years.clone(),
        five_years.clone(),
        five_years.clone(),
        five_years.clone(),
        five_years.clone(),
        five_years,
    ];

    let record = ctx
        .fetch_one(
            templates::COHORT_POOLS,
            &json!({ "schema": schema, "ftf_list": ftf_list }),
            &params,
        )
        .await?;

    let all_patients = record.count("all_patients");
    let encounter_pool = record.count("enc_pool_5");

    for row in COHORT_ROWS {
        let n = record.count(row.result_column);
        let pct_cell = match row.denominator {
            PoolDenominator::NoPercent => Cell::plain(""),
            PoolDenominator::AllPatients => {
                Cell::plain(format_percentage(share_of_total(n, all_patients, 1), 1))
            }
            PoolDenominator::EncounterPool => {
                Cell::plain(format_percentage(share_of_total(n, encounter_pool, 1), 1))
            }
        };
        table.push_row(vec![
            Cell::label(row.metric),
            Cell::plain(row.description),
            Cell::plain(n.to_string()),
            pct_cell,
        ]);
    }

    Ok(table)
}
