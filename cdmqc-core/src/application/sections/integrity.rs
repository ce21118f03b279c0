// cdmqc-core/src/application/sections/integrity.rs
//
// The single-schema integrity checks (1.05 through 1.12). Each produces one
// table over the catalogue tables present in the target schema. Counts come
// back raw from SQL; percentages and threshold classification happen here,
// in the domain, so the two zero-division policies stay testable.

use chrono::NaiveDate;
use serde_json::json;

use super::{ReportContext, date_param};
use crate::domain::catalog::checks::{
    MULTI_PATIENT_TABLES, ORPHAN_ENCOUNTER_TABLES, ORPHAN_PATID_TABLES, ORPHAN_PROVIDER_TABLES,
    REPLICATION_TABLES,
};
use crate::domain::catalog::{CDM_TABLES, lookup};
use crate::domain::quality::metrics::{format_percentage, share_of_total};
use crate::domain::quality::rules::{CheckId, rule};
use crate::domain::report::{Cell, ReportTable};
use crate::error::CdmqcError;
use crate::infrastructure::sql::templates;

/// Check 1.05 — primary key definition errors. A table passes when every
/// key value is distinct; the published result column answers "are there
/// primary key errors?", so "Yes" is the exception.
pub async fn primary_keys(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;
    let check = rule(CheckId::PrimaryKey);

    let mut table = ReportTable::new(
        "Check 1.05 - Primary key definition errors",
        "Distinct primary key values compared to total rows, per CDM table.",
        &["Table", "Primary key", "Distinct keys", "Total rows", "Errors"],
    );

    for def in CDM_TABLES {
        if !present.contains(def.name) {
            continue;
        }
        let record = ctx
            .fetch_one(
                templates::PRIMARY_KEY,
                &json!({
                    "schema": schema,
                    "table": def.name,
                    "key_expr": def.key_expression(),
                }),
                &[],
            )
            .await?;

        let distinct = record.count("distinct_keys");
        let total = record.count("total_rows");
        let verdict = if distinct == total { "No" } else { "Yes" };
        let outcome = check.classify_text(verdict);

        table.push_row(vec![
            Cell::label(def.name),
            Cell::plain(def.key_description),
            Cell::plain(distinct.to_string()),
            Cell::plain(total.to_string()),
            Cell::classified(verdict, outcome),
        ]);
    }

    Ok(table)
}

/// Shared body of the orphan checks: values of `column` in each listed table
/// with no match in `ref_table`. Returns an empty section when the reference
/// table itself is absent from the schema.
async fn orphan_section(
    ctx: &ReportContext<'_>,
    schema: &str,
    check_id: CheckId,
    title: &str,
    description: &str,
    tables: &[&str],
    column_of: impl Fn(&str) -> Option<&'static str>,
    ref_table: &str,
    ref_column: &str,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;
    let check = rule(check_id);

    let mut table = ReportTable::new(
        title,
        description,
        &["Table", "Orphans", "Total distinct", "Percentage"],
    );

    if !present.contains(ref_table) {
        return Ok(table);
    }

    for name in tables {
        if !present.contains(*name) {
            continue;
        }
        let Some(column) = column_of(name) else {
            continue;
        };
        let record = ctx
            .fetch_one(
                templates::ORPHANS,
                &json!({
                    "schema": schema,
                    "table": name,
                    "column": column,
                    "ref_table": ref_table,
                    "ref_column": ref_column,
                }),
                &[],
            )
            .await?;

        let orphans = record.count("orphans");
        let total = record.count("total");
        let pct = share_of_total(orphans, total, check.pct_decimals);
        let outcome = match check_id {
            // 1.09 thresholds on the percentage; the count checks on the count.
            CheckId::OrphanEncounter => check.classify_number(Some(pct)),
            _ => check.classify_count(orphans),
        };

        table.push_row(vec![
            Cell::label(*name),
            Cell::classified(orphans.to_string(), outcome),
            Cell::plain(total.to_string()),
            Cell::classified(format_percentage(pct, check.pct_decimals), outcome),
        ]);
    }

    Ok(table)
}

/// Check 1.08 — PATIDs with no DEMOGRAPHIC row. Any orphan is an exception.
pub async fn orphan_patids(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    orphan_section(
        ctx,
        schema,
        CheckId::OrphanPatid,
        "Check 1.08 - Orphan PATIDs",
        "PATID values with no matching DEMOGRAPHIC record.",
        ORPHAN_PATID_TABLES,
        |_| Some("PATID"),
        "DEMOGRAPHIC",
        "PATID",
    )
    .await
}

/// Check 1.09 — ENCOUNTERIDs with no ENCOUNTER row. Exception above 5% of
/// the table's distinct encounter ids.
pub async fn orphan_encounters(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    orphan_section(
        ctx,
        schema,
        CheckId::OrphanEncounter,
        "Check 1.09 - Orphan ENCOUNTERIDs",
        "ENCOUNTERID values with no matching ENCOUNTER record.",
        ORPHAN_ENCOUNTER_TABLES,
        |_| Some("ENCOUNTERID"),
        "ENCOUNTER",
        "ENCOUNTERID",
    )
    .await
}

/// Check 1.12 — PROVIDERIDs with no PROVIDER row. The provider column name
/// varies per table and comes from the catalogue.
pub async fn orphan_providers(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    orphan_section(
        ctx,
        schema,
        CheckId::OrphanProvider,
        "Check 1.12 - Orphan PROVIDERIDs",
        "Provider references with no matching PROVIDER record.",
        ORPHAN_PROVIDER_TABLES,
        |name| lookup(name).and_then(|def| def.provider_id_column),
        "PROVIDER",
        "PROVIDERID",
    )
    .await
}

/// Check 1.10 — replication errors. DIAGNOSIS and PROCEDURES carry copies of
/// ENC_TYPE and ADMIT_DATE that must agree with ENCOUNTER. Rows where either
/// side is NULL are not counted as mismatches (SQL inequality semantics).
pub async fn replication_errors(
    ctx: &ReportContext<'_>,
    schema: &str,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;
    let check = rule(CheckId::Replication);

    let mut table = ReportTable::new(
        "Check 1.10 - Replication errors",
        "ENC_TYPE / ADMIT_DATE copies that disagree with the ENCOUNTER table.",
        &["Table", "Mismatched rows", "Mismatched fields"],
    );

    if !present.contains("ENCOUNTER") {
        return Ok(table);
    }

    for name in REPLICATION_TABLES {
        if !present.contains(*name) {
            continue;
        }
        let record = ctx
            .fetch_one(
                templates::REPLICATION,
                &json!({ "schema": schema, "table": name }),
                &[],
            )
            .await?;

        let mismatches = record.count("mismatches");
        let fields = record.text("mismatch_fields").unwrap_or("").to_string();
        let outcome = check.classify_count(mismatches);

        table.push_row(vec![
            Cell::label(*name),
            Cell::classified(mismatches.to_string(), outcome),
            Cell::plain(fields),
        ]);
    }

    Ok(table)
}

/// Check 1.11 — encounters assigned to more than one patient, within the
/// lookback window. Exception above 5% of the table's distinct encounters.
pub async fn multi_patient_encounters(
    ctx: &ReportContext<'_>,
    schema: &str,
    window_start: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    let present = ctx.tables_in(schema).await?;
    let check = rule(CheckId::MultiPatient);

    let mut table = ReportTable::new(
        "Check 1.11 - Encounters assigned to more than one patient",
        "Distinct ENCOUNTERIDs mapping to multiple PATIDs inside the window.",
        &["Table", "Shared encounters", "Total encounters", "Percentage"],
    );

    for name in MULTI_PATIENT_TABLES {
        if !present.contains(*name) {
            continue;
        }
        // Guaranteed by the catalogue tests: every listed table is known and
        // declares a temporal column.
        let Some(temporal) = lookup(name).and_then(|def| def.temporal_column) else {
            continue;
        };
        let record = ctx
            .fetch_one(
                templates::MULTI_PATIENT,
                &json!({ "schema": schema, "table": name, "temporal": temporal }),
                &[date_param(window_start)],
            )
            .await?;

        let shared = record.count("shared_encounters");
        let total = record.count("total_encounters");
        let pct = share_of_total(shared, total, check.pct_decimals);
        let outcome = check.classify_number(Some(pct));

        table.push_row(vec![
            Cell::label(*name),
            Cell::classified(shared.to_string(), outcome),
            Cell::plain(total.to_string()),
            Cell::classified(format_percentage(pct, check.pct_decimals), outcome),
        ]);
    }

    Ok(table)
}
