// cdmqc-core/src/application/sections/persistence.rs
//
// The two-schema drift checks (4.01, 4.02, 4.03): the same windowed volume
// queries run against the previous and current snapshot, diffed in the
// domain. The caller derives the window start from its cutoff date once, and
// it applies identically to both schemas, so the comparison stays
// like-for-like. A drop
// below -5% is flagged (blue), not hard: it needs an ETL explanation, not a
// fix before publication.

use chrono::NaiveDate;
use serde_json::json;

use super::{ReportContext, date_param};
use crate::domain::catalog::checks::{
    CODE_SLICES, ENCOUNTER_DOMAIN_TABLES, ENCOUNTER_TYPES, PERSISTENCE_TABLES, has_own_enc_type,
};
use crate::domain::catalog::lookup;
use crate::domain::quality::compare::SnapshotComparison;
use crate::domain::quality::metrics::format_percentage;
use crate::domain::quality::rules::{CheckId, CheckRule, rule};
use crate::domain::report::{Cell, ReportTable};
use crate::error::CdmqcError;
use crate::infrastructure::sql::{quote_literal, templates};
use crate::ports::connector::{Record, SqlValue};

/// Renders a percent-change cell. An undefined change (zero baseline) shows
/// as "n/a" and never flags.
fn change_cell(cmp: &SnapshotComparison, check: &CheckRule) -> Cell {
    let outcome = check.classify_number(cmp.change);
    let text = match cmp.change {
        Some(v) => format_percentage(v, check.pct_decimals),
        None => "n/a".to_string(),
    };
    Cell::classified(text, outcome)
}

async fn volume(
    ctx: &ReportContext<'_>,
    schema: &str,
    table: &str,
    patient_column: Option<&str>,
    temporal: Option<&str>,
    window_start: NaiveDate,
) -> Result<Record, CdmqcError> {
    let params: Vec<SqlValue> = if temporal.is_some() {
        vec![date_param(window_start)]
    } else {
        Vec::new()
    };
    ctx.fetch_one(
        templates::VOLUME,
        &json!({
            "schema": schema,
            "table": table,
            "patient_column": patient_column,
            "temporal": temporal,
        }),
        &params,
    )
    .await
}

/// Check 4.01 — record and patient volume per CDM table, previous vs current
/// refresh, inside the lookback window.
pub async fn table_drift(
    ctx: &ReportContext<'_>,
    previous: &str,
    current: &str,
    window_start: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    let prev_tables = ctx.tables_in(previous).await?;
    let curr_tables = ctx.tables_in(current).await?;
    let check = rule(CheckId::TableDrift);

    let mut table = ReportTable::new(
        "Check 4.01 - Persistence of CDM table volume",
        "Record and patient counts per table, previous refresh vs current.",
        &[
            "Table",
            "Records (prev)",
            "Records (curr)",
            "Records change (%)",
            "Patients (prev)",
            "Patients (curr)",
            "Patients change (%)",
        ],
    );

    for name in PERSISTENCE_TABLES {
        if !prev_tables.contains(*name) || !curr_tables.contains(*name) {
            continue;
        }
        let Some(def) = lookup(name) else { continue };

        let prev = volume(
            ctx,
            previous,
            name,
            def.patient_id_column,
            def.temporal_column,
            window_start,
        )
        .await?;
        let curr = volume(
            ctx,
            current,
            name,
            def.patient_id_column,
            def.temporal_column,
            window_start,
        )
        .await?;

        let records = SnapshotComparison::new(prev.count("records"), curr.count("records"));
        let patients = SnapshotComparison::new(prev.count("patients"), curr.count("patients"));

        table.push_row(vec![
            Cell::label(*name),
            Cell::plain(records.previous.to_string()),
            Cell::plain(records.current.to_string()),
            change_cell(&records, check),
            Cell::plain(patients.previous.to_string()),
            Cell::plain(patients.current.to_string()),
            change_cell(&patients, check),
        ]);
    }

    Ok(table)
}

/// Check 4.02 — the same drift comparison broken down by encounter type.
/// DIAGNOSIS and PROCEDURES filter on their own ENC_TYPE copy; the other
/// domain tables reach it through a join to ENCOUNTER.
pub async fn encounter_drift(
    ctx: &ReportContext<'_>,
    previous: &str,
    current: &str,
    window_start: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    let prev_tables = ctx.tables_in(previous).await?;
    let curr_tables = ctx.tables_in(current).await?;
    let check = rule(CheckId::EncounterDrift);

    let mut table = ReportTable::new(
        "Check 4.02 - Persistence of volume per encounter type",
        "Record and patient counts per domain table and encounter type.",
        &[
            "Table",
            "Encounter type",
            "Records (prev)",
            "Records (curr)",
            "Records change (%)",
            "Patients (prev)",
            "Patients (curr)",
            "Patients change (%)",
        ],
    );

    for name in ENCOUNTER_DOMAIN_TABLES {
        if !prev_tables.contains(*name) || !curr_tables.contains(*name) {
            continue;
        }
        // The joined variant also needs ENCOUNTER on both sides.
        if !has_own_enc_type(name)
            && (!prev_tables.contains("ENCOUNTER") || !curr_tables.contains("ENCOUNTER"))
        {
            continue;
        }
        let Some(temporal) = lookup(name).and_then(|def| def.temporal_column) else {
            continue;
        };

        for (code, label) in ENCOUNTER_TYPES {
            let mut sides = Vec::with_capacity(2);
            for schema in [previous, current] {
                let context = json!({ "schema": schema, "table": name, "temporal": temporal });
                let record = if has_own_enc_type(name) {
                    ctx.fetch_one(
                        templates::ENCOUNTER_VOLUME_DIRECT,
                        &context,
                        &[date_param(window_start), SqlValue::Text((*code).to_string())],
                    )
                    .await?
                } else {
                    ctx.fetch_one(
                        templates::ENCOUNTER_VOLUME_JOINED,
                        &context,
                        &[
                            date_param(window_start),
                            SqlValue::Text((*code).to_string()),
                            date_param(window_start),
                        ],
                    )
                    .await?
                };
                sides.push(record);
            }

            let records = SnapshotComparison::new(sides[0].count("records"), sides[1].count("records"));
            let patients =
                SnapshotComparison::new(sides[0].count("patients"), sides[1].count("patients"));

            table.push_row(vec![
                Cell::label(*name),
                Cell::plain(format!("{code} ({label})")),
                Cell::plain(records.previous.to_string()),
                Cell::plain(records.current.to_string()),
                change_cell(&records, check),
                Cell::plain(patients.previous.to_string()),
                Cell::plain(patients.current.to_string()),
                change_cell(&patients, check),
            ]);
        }
    }

    Ok(table)
}

/// Check 4.03 — drift in record volume and distinct code counts per code
/// slice (DX/PX/NDC/vaccine/medication code types).
pub async fn code_drift(
    ctx: &ReportContext<'_>,
    previous: &str,
    current: &str,
    window_start: NaiveDate,
) -> Result<ReportTable, CdmqcError> {
    let prev_tables = ctx.tables_in(previous).await?;
    let curr_tables = ctx.tables_in(current).await?;
    let check = rule(CheckId::CodeDrift);

    let mut table = ReportTable::new(
        "Check 4.03 - Persistence of code volume",
        "Record and distinct-code counts per code slice, previous vs current.",
        &[
            "Table",
            "Code",
            "Type",
            "Records (prev)",
            "Records (curr)",
            "Records change (%)",
            "Codes (prev)",
            "Codes (curr)",
            "Codes change (%)",
        ],
    );

    for slice in CODE_SLICES {
        if !prev_tables.contains(slice.table) || !curr_tables.contains(slice.table) {
            continue;
        }
        let Some(temporal) = lookup(slice.table).and_then(|def| def.temporal_column) else {
            continue;
        };
        let type_filter = slice
            .type_column
            .map(|col| format!("{col} = {}", quote_literal(slice.type_value)));

        let mut sides = Vec::with_capacity(2);
        for schema in [previous, current] {
            let record = ctx
                .fetch_one(
                    templates::CODE_VOLUME,
                    &json!({
                        "schema": schema,
                        "table": slice.table,
                        "temporal": temporal,
                        "code_column": slice.code_column,
                        "type_filter": type_filter,
                    }),
                    &[date_param(window_start)],
                )
                .await?;
            sides.push(record);
        }

        let records = SnapshotComparison::new(sides[0].count("records"), sides[1].count("records"));
        let codes = SnapshotComparison::new(sides[0].count("codes"), sides[1].count("codes"));

        let type_label = match slice.type_column {
            Some(_) => slice.type_value,
            None => "",
        };
        table.push_row(vec![
            Cell::label(slice.table),
            Cell::plain(slice.code_column),
            Cell::plain(type_label),
            Cell::plain(records.previous.to_string()),
            Cell::plain(records.current.to_string()),
            change_cell(&records, check),
            Cell::plain(codes.previous.to_string()),
            Cell::plain(codes.current.to_string()),
            change_cell(&codes, check),
        ]);
    }

    Ok(table)
}
