// cdmqc-core/tests/sections.rs
//
// End-to-end section tests against a seeded in-memory warehouse. Each test
// builds the smallest schema that exercises one check, runs the section, and
// asserts on counts, percentages and highlights of the returned table.

use anyhow::Result;
use chrono::NaiveDate;

use cdmqc_core::application::ReportContext;
use cdmqc_core::application::sections::{cohorts, demographics, integrity, persistence, trend};
use cdmqc_core::domain::dates::Granularity;
use cdmqc_core::domain::report::{Highlight, ReportTable};
use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::infrastructure::sql::jinja::SqlRenderer;
use cdmqc_core::ports::connector::Connector;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn row_texts(table: &ReportTable, index: usize) -> Vec<&str> {
    table.rows[index].iter().map(|c| c.text.as_str()).collect()
}

#[tokio::test]
async fn test_orphan_patids_count_and_share() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DEMOGRAPHIC (PATID VARCHAR);
             INSERT INTO CDM_T.DEMOGRAPHIC SELECT 'P' || i FROM range(90) t(i);
             CREATE TABLE CDM_T.DIAGNOSIS (PATID VARCHAR);
             INSERT INTO CDM_T.DIAGNOSIS SELECT 'P' || i FROM range(80) t(i);
             INSERT INTO CDM_T.DIAGNOSIS SELECT 'X' || i FROM range(10) t(i);",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = integrity::orphan_patids(&ctx, "CDM_T").await?;

    // Only DIAGNOSIS is present from the applicability list.
    assert_eq!(table.rows.len(), 1);
    // 10 orphans over 90 distinct PATIDs in the table -> 11.1%.
    assert_eq!(row_texts(&table, 0), vec!["DIAGNOSIS", "10", "90", "11.1"]);
    assert_eq!(table.rows[0][1].highlight, Highlight::Red);
    Ok(())
}

#[tokio::test]
async fn test_orphan_section_empty_without_reference_table() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DIAGNOSIS (PATID VARCHAR);
             INSERT INTO CDM_T.DIAGNOSIS VALUES ('P1');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    // No DEMOGRAPHIC in the schema: an empty section, not an error.
    let table = integrity::orphan_patids(&ctx, "CDM_T").await?;
    assert!(table.rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_primary_key_duplicates_flag_red() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DEMOGRAPHIC (PATID VARCHAR);
             INSERT INTO CDM_T.DEMOGRAPHIC VALUES ('P1'), ('P2');
             CREATE TABLE CDM_T.ENCOUNTER (ENCOUNTERID VARCHAR);
             INSERT INTO CDM_T.ENCOUNTER VALUES ('E1'), ('E1'), ('E2');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = integrity::primary_keys(&ctx, "CDM_T").await?;

    // Catalogue order: DEMOGRAPHIC before ENCOUNTER.
    assert_eq!(table.rows.len(), 2);
    let demographic = &table.rows[0];
    assert_eq!(demographic[4].text, "No");
    assert_eq!(demographic[4].highlight, Highlight::None);

    let encounter = &table.rows[1];
    assert_eq!(encounter[2].text, "2"); // distinct
    assert_eq!(encounter[3].text, "3"); // total
    assert_eq!(encounter[4].text, "Yes");
    assert_eq!(encounter[4].highlight, Highlight::Red);
    Ok(())
}

#[tokio::test]
async fn test_composite_primary_key_separator() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    // ('AB','C') and ('A','BC') must stay distinct under concatenation.
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DEATH (PATID VARCHAR, DEATH_SOURCE VARCHAR);
             INSERT INTO CDM_T.DEATH VALUES ('AB', 'C'), ('A', 'BC');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = integrity::primary_keys(&ctx, "CDM_T").await?;
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][4].text, "No");
    Ok(())
}

#[tokio::test]
async fn test_replication_mismatch_names_the_field() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.ENCOUNTER (ENCOUNTERID VARCHAR, ENC_TYPE VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.ENCOUNTER VALUES
               ('E1', 'AV', DATE '2024-01-01'),
               ('E2', 'IP', DATE '2024-02-01');
             CREATE TABLE CDM_T.DIAGNOSIS (ENCOUNTERID VARCHAR, ENC_TYPE VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.DIAGNOSIS VALUES
               ('E1', 'ED', DATE '2024-01-01'),
               ('E2', 'IP', DATE '2024-02-01');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = integrity::replication_errors(&ctx, "CDM_T").await?;
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][1].text, "1");
    assert_eq!(table.rows[0][1].highlight, Highlight::Red);
    assert_eq!(table.rows[0][2].text, "ENC_TYPE");
    Ok(())
}

#[tokio::test]
async fn test_multi_patient_encounters_within_window() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DIAGNOSIS (PATID VARCHAR, ENCOUNTERID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.DIAGNOSIS VALUES
               ('P1', 'E1', DATE '2024-01-01'),
               ('P2', 'E1', DATE '2024-01-02'),
               ('P1', 'E2', DATE '2024-02-01'),
               -- Shared encounter entirely before the window: not counted.
               ('P1', 'E3', DATE '2001-01-01'),
               ('P2', 'E3', DATE '2001-01-02');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table =
        integrity::multi_patient_encounters(&ctx, "CDM_T", date("2015-01-01")).await?;
    assert_eq!(table.rows.len(), 1);
    // 1 shared encounter over 3 distinct -> 33.33%.
    assert_eq!(row_texts(&table, 0), vec!["DIAGNOSIS", "1", "3", "33.33"]);
    assert_eq!(table.rows[0][3].highlight, Highlight::Red);
    Ok(())
}

#[tokio::test]
async fn test_orphan_providers_use_per_table_column() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.PROVIDER (PROVIDERID VARCHAR);
             INSERT INTO CDM_T.PROVIDER VALUES ('DR1'), ('DR2');
             CREATE TABLE CDM_T.PRESCRIBING (RX_PROVIDERID VARCHAR);
             INSERT INTO CDM_T.PRESCRIBING VALUES ('DR1'), ('GHOST');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = integrity::orphan_providers(&ctx, "CDM_T").await?;
    assert_eq!(table.rows.len(), 1);
    // 1 orphan over 2 distinct provider ids -> 50.0%.
    assert_eq!(row_texts(&table, 0), vec!["PRESCRIBING", "1", "2", "50.0"]);
    Ok(())
}

#[tokio::test]
async fn test_table_drift_flags_blue_below_minus_five() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_PREV;
             CREATE SCHEMA CDM_CURR;
             CREATE TABLE CDM_PREV.DIAGNOSIS (PATID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_PREV.DIAGNOSIS SELECT 'P' || i, DATE '2024-01-01' FROM range(1000) t(i);
             CREATE TABLE CDM_CURR.DIAGNOSIS (PATID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_CURR.DIAGNOSIS SELECT 'P' || i, DATE '2024-01-01' FROM range(940) t(i);",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table =
        persistence::table_drift(&ctx, "CDM_PREV", "CDM_CURR", date("2015-01-01")).await?;
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row[0].text, "DIAGNOSIS");
    assert_eq!(row[1].text, "1000");
    assert_eq!(row[2].text, "940");
    // 1000 -> 940 records is -6.0%: flagged, not hard.
    assert_eq!(row[3].text, "-6.0");
    assert_eq!(row[3].highlight, Highlight::Blue);
    Ok(())
}

#[tokio::test]
async fn test_drift_on_zero_baseline_is_undefined_not_flagged() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_PREV;
             CREATE SCHEMA CDM_CURR;
             CREATE TABLE CDM_PREV.DIAGNOSIS (PATID VARCHAR, ADMIT_DATE DATE);
             CREATE TABLE CDM_CURR.DIAGNOSIS (PATID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_CURR.DIAGNOSIS VALUES ('P1', DATE '2024-01-01');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table =
        persistence::table_drift(&ctx, "CDM_PREV", "CDM_CURR", date("2015-01-01")).await?;
    let row = &table.rows[0];
    assert_eq!(row[3].text, "n/a");
    assert_eq!(row[3].highlight, Highlight::None);
    Ok(())
}

#[tokio::test]
async fn test_encounter_drift_direct_filter() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_PREV;
             CREATE SCHEMA CDM_CURR;
             CREATE TABLE CDM_PREV.DIAGNOSIS (PATID VARCHAR, ENC_TYPE VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_PREV.DIAGNOSIS VALUES
               ('P1', 'AV', DATE '2024-01-01'),
               ('P2', 'AV', DATE '2024-01-02'),
               ('P3', 'IP', DATE '2024-01-03');
             CREATE TABLE CDM_CURR.DIAGNOSIS (PATID VARCHAR, ENC_TYPE VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_CURR.DIAGNOSIS VALUES
               ('P1', 'AV', DATE '2024-01-01'),
               ('P3', 'IP', DATE '2024-01-03');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table =
        persistence::encounter_drift(&ctx, "CDM_PREV", "CDM_CURR", date("2015-01-01")).await?;
    // One domain table, five encounter types.
    assert_eq!(table.rows.len(), 5);
    let av = &table.rows[0];
    assert_eq!(av[1].text, "AV (Ambulatory_Visit)");
    assert_eq!(av[2].text, "2");
    assert_eq!(av[3].text, "1");
    assert_eq!(av[4].text, "-50.0");
    assert_eq!(av[4].highlight, Highlight::Blue);
    Ok(())
}

#[tokio::test]
async fn test_code_drift_counts_distinct_codes() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_PREV;
             CREATE SCHEMA CDM_CURR;
             CREATE TABLE CDM_PREV.DISPENSING (PATID VARCHAR, NDC VARCHAR, DISPENSE_DATE DATE);
             INSERT INTO CDM_PREV.DISPENSING VALUES
               ('P1', 'N1', DATE '2024-01-01'),
               ('P2', 'N2', DATE '2024-01-01'),
               ('P3', 'N2', DATE '2024-01-01');
             CREATE TABLE CDM_CURR.DISPENSING (PATID VARCHAR, NDC VARCHAR, DISPENSE_DATE DATE);
             INSERT INTO CDM_CURR.DISPENSING VALUES
               ('P1', 'N1', DATE '2024-01-01'),
               ('P2', 'N1', DATE '2024-01-01');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = persistence::code_drift(&ctx, "CDM_PREV", "CDM_CURR", date("2015-01-01")).await?;
    // Only the DISPENSING/NDC slice applies (no type column).
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row[1].text, "NDC");
    assert_eq!(row[2].text, "");
    assert_eq!(row[3].text, "3");
    assert_eq!(row[4].text, "2");
    assert_eq!(row[5].text, "-33.3");
    assert_eq!(row[6].text, "2"); // distinct codes prev
    assert_eq!(row[7].text, "1"); // distinct codes curr
    assert_eq!(row[8].text, "-50.0");
    assert_eq!(row[8].highlight, Highlight::Blue);
    Ok(())
}

#[tokio::test]
async fn test_demographic_summary_denominator_switch() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DEMOGRAPHIC (
               PATID VARCHAR, BIRTH_DATE DATE, HISPANIC VARCHAR, SEX VARCHAR,
               RACE VARCHAR, GENDER_IDENTITY VARCHAR, SEXUAL_ORIENTATION VARCHAR);
             INSERT INTO CDM_T.DEMOGRAPHIC VALUES
               ('A', DATE '1980-05-01', 'N', 'F', '05', 'W', 'ST'),
               ('B', DATE '1985-07-01', 'N', 'M', '05', 'M', 'ST'),
               ('C', DATE '1990-01-01', 'Y', 'F', '02', 'W', 'BI'),
               ('D', DATE '1975-03-01', 'N', 'M', '03', 'M', 'GA');
             CREATE TABLE CDM_T.ENCOUNTER (PATID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.ENCOUNTER VALUES ('A', DATE '2024-03-01');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = demographics::demographic_summary(&ctx, "CDM_T").await?;
    assert_eq!(table.rows.len(), 41);

    // Patients row.
    assert_eq!(table.rows[0][0].text, "Patients");
    assert_eq!(table.rows[0][2].text, "4");
    assert_eq!(table.rows[0][3].text, ""); // no percentage

    // Race "White": 2 of 4 patients.
    let white_rows: Vec<_> = table
        .rows
        .iter()
        .filter(|r| r[1].text == "White")
        .collect();
    assert_eq!(white_rows.len(), 2);
    assert_eq!(white_rows[0][2].text, "2");
    assert_eq!(white_rows[0][3].text, "50.0");

    // Race among patients with an encounter: only A qualifies, and A is
    // white, so 1 of 1 under the encounter denominator.
    assert_eq!(white_rows[1][2].text, "1");
    assert_eq!(white_rows[1][3].text, "100.0");
    Ok(())
}

#[tokio::test]
async fn test_patient_pools_narrow_progressively() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.DEMOGRAPHIC (PATID VARCHAR);
             INSERT INTO CDM_T.DEMOGRAPHIC VALUES ('A'), ('B'), ('C');
             CREATE TABLE CDM_T.ENCOUNTER (PATID VARCHAR, ADMIT_DATE DATE, ENC_TYPE VARCHAR);
             INSERT INTO CDM_T.ENCOUNTER VALUES
               ('A', DATE '2024-12-01', 'AV'),
               ('B', DATE '2021-01-01', 'AV'),
               ('C', DATE '2024-12-01', 'OA'); -- not face-to-face
             CREATE TABLE CDM_T.DIAGNOSIS (PATID VARCHAR, ADMIT_DATE DATE, ENC_TYPE VARCHAR);
             INSERT INTO CDM_T.DIAGNOSIS VALUES ('A', DATE '2024-12-01', 'AV');
             CREATE TABLE CDM_T.PROCEDURES (PATID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.PROCEDURES VALUES ('A', DATE '2024-12-01');
             CREATE TABLE CDM_T.VITAL (PATID VARCHAR, MEASURE_DATE DATE);
             INSERT INTO CDM_T.VITAL VALUES ('A', DATE '2024-12-01');
             CREATE TABLE CDM_T.PRESCRIBING (PATID VARCHAR, RX_ORDER_DATE DATE);
             INSERT INTO CDM_T.PRESCRIBING VALUES ('A', DATE '2024-12-01');
             CREATE TABLE CDM_T.MED_ADMIN (PATID VARCHAR, MEDADMIN_START_DATE DATE);
             CREATE TABLE CDM_T.LAB_RESULT_CM (PATID VARCHAR, RESULT_DATE DATE);
             INSERT INTO CDM_T.LAB_RESULT_CM VALUES ('A', DATE '2024-12-01');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = cohorts::patient_pools(&ctx, "CDM_T", date("2025-06-01")).await?;
    assert_eq!(table.rows.len(), 8);

    // All patients: 3, no percentage.
    assert_eq!(table.rows[0][2].text, "3");
    assert_eq!(table.rows[0][3].text, "");
    // Five-year face-to-face pool: A and B, 66.7% of all patients.
    assert_eq!(table.rows[1][2].text, "2");
    assert_eq!(table.rows[1][3].text, "66.7");
    // One-year pool: A only, 33.3% of all patients.
    assert_eq!(table.rows[2][2].text, "1");
    assert_eq!(table.rows[2][3].text, "33.3");
    // Narrowed pools: A only, 50.0% of the encounter pool.
    for row in &table.rows[3..] {
        assert_eq!(row[2].text, "1");
        assert_eq!(row[3].text, "50.0");
    }
    Ok(())
}

#[tokio::test]
async fn test_trend_yearly_buckets() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE SCHEMA CDM_T;
             CREATE TABLE CDM_T.ENCOUNTER (PATID VARCHAR, ENCOUNTERID VARCHAR, ADMIT_DATE DATE);
             INSERT INTO CDM_T.ENCOUNTER VALUES
               ('P1', 'E1', DATE '2020-03-01'),
               ('P2', 'E2', DATE '2020-09-01'),
               ('P1', 'E3', DATE '2021-01-15');",
        )
        .await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let table = trend::record_trend(
        &ctx,
        "CDM_T",
        "ENCOUNTER",
        Granularity::Yearly,
        date("2020-01-01"),
        date("2021-12-31"),
    )
    .await?;

    assert_eq!(table.rows.len(), 2);
    assert_eq!(row_texts(&table, 0), vec!["2020", "2", "2"]);
    assert_eq!(row_texts(&table, 1), vec!["2021", "1", "1"]);
    Ok(())
}

#[tokio::test]
async fn test_trend_rejects_unknown_table_and_bad_range() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector.execute("CREATE SCHEMA CDM_T").await?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let unknown = trend::record_trend(
        &ctx,
        "CDM_T",
        "NOT_A_TABLE",
        Granularity::Yearly,
        date("2020-01-01"),
        date("2021-01-01"),
    )
    .await;
    assert!(unknown.is_err());

    let inverted = trend::record_trend(
        &ctx,
        "CDM_T",
        "ENCOUNTER",
        Granularity::Yearly,
        date("2021-01-01"),
        date("2020-01-01"),
    )
    .await;
    assert!(inverted.is_err());
    Ok(())
}

#[tokio::test]
async fn test_invalid_schema_name_is_rejected() -> Result<()> {
    let connector = DuckDBConnector::new(":memory:")?;
    let renderer = SqlRenderer::new();
    let ctx = ReportContext::new(&connector, &renderer);

    let result = integrity::orphan_patids(&ctx, "CDM; DROP TABLE x").await;
    assert!(result.is_err());
    Ok(())
}
