use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

use cdmqc_core::infrastructure::adapters::duckdb::DuckDBConnector;
use cdmqc_core::ports::connector::Connector;

/// Test environment: a temp working directory and a seeded DuckDB file the
/// CLI is pointed at through CDMQC_DB_PATH.
struct CdmqcTestEnv {
    _tmp: TempDir,
    root: PathBuf,
    db_path: PathBuf,
}

impl CdmqcTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        let db_path = root.join("warehouse.duckdb");
        Ok(Self {
            _tmp: tmp,
            root,
            db_path,
        })
    }

    /// Seeds the warehouse file, then releases the connection so the CLI can
    /// open it.
    async fn seed(&self, sql: &str) -> Result<()> {
        let connector = DuckDBConnector::new(&self.db_path.to_string_lossy())?;
        connector.execute(sql).await?;
        Ok(())
    }

    fn cdmqc(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cdmqc"));
        cmd.current_dir(&self.root);
        cmd.env("CDMQC_DB_PATH", &self.db_path);
        cmd
    }
}

#[test]
fn test_describe_runs_offline() -> Result<()> {
    let env = CdmqcTestEnv::new()?;

    env.cdmqc()
        .arg("describe")
        .assert()
        .success()
        .stdout(predicates::str::contains("DEMOGRAPHIC"))
        .stdout(predicates::str::contains("ENCOUNTERID is unique"));
    Ok(())
}

#[tokio::test]
async fn test_schemas_lists_snapshots_by_prefix() -> Result<()> {
    let env = CdmqcTestEnv::new()?;
    env.seed(
        "CREATE SCHEMA CDM_2024;
         CREATE SCHEMA CDM_2025;
         CREATE SCHEMA STAGING;
         CREATE TABLE CDM_2025.DEMOGRAPHIC (PATID VARCHAR);",
    )
    .await?;

    env.cdmqc()
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicates::str::contains("CDM_2024"))
        .stdout(predicates::str::contains("CDM_2025"))
        .stdout(predicates::str::contains("STAGING").not());
    Ok(())
}

#[tokio::test]
async fn test_checks_report_orphans() -> Result<()> {
    let env = CdmqcTestEnv::new()?;
    env.seed(
        "CREATE SCHEMA CDM_2025;
         CREATE TABLE CDM_2025.DEMOGRAPHIC (PATID VARCHAR);
         INSERT INTO CDM_2025.DEMOGRAPHIC VALUES ('P1'), ('P2');
         CREATE TABLE CDM_2025.DIAGNOSIS (PATID VARCHAR);
         INSERT INTO CDM_2025.DIAGNOSIS VALUES ('P1'), ('GHOST');",
    )
    .await?;

    env.cdmqc()
        .args(["checks", "--schema", "CDM_2025", "--cutoff", "2025-06-01"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Check 1.05"))
        .stdout(predicates::str::contains("Check 1.08"))
        .stdout(predicates::str::contains("DIAGNOSIS"));
    Ok(())
}

#[tokio::test]
async fn test_persistence_compares_two_schemas() -> Result<()> {
    let env = CdmqcTestEnv::new()?;
    env.seed(
        "CREATE SCHEMA CDM_2024;
         CREATE SCHEMA CDM_2025;
         CREATE TABLE CDM_2024.ENCOUNTER (PATID VARCHAR, ENCOUNTERID VARCHAR, ADMIT_DATE DATE);
         INSERT INTO CDM_2024.ENCOUNTER SELECT 'P' || i, 'E' || i, DATE '2024-01-01' FROM range(100) t(i);
         CREATE TABLE CDM_2025.ENCOUNTER (PATID VARCHAR, ENCOUNTERID VARCHAR, ADMIT_DATE DATE);
         INSERT INTO CDM_2025.ENCOUNTER SELECT 'P' || i, 'E' || i, DATE '2024-01-01' FROM range(90) t(i);",
    )
    .await?;

    env.cdmqc()
        .args([
            "persistence",
            "--previous",
            "CDM_2024",
            "--current",
            "CDM_2025",
            "--cutoff",
            "2025-06-01",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("Check 4.01"))
        .stdout(predicates::str::contains("-10.0"));
    Ok(())
}

#[test]
fn test_trend_rejects_unknown_table() -> Result<()> {
    let env = CdmqcTestEnv::new()?;

    env.cdmqc()
        .args([
            "trend",
            "--schema",
            "CDM_2025",
            "--table",
            "NOT_A_TABLE",
            "--start",
            "2020-01-01",
            "--end",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not part of the CDM catalogue"));
    Ok(())
}

#[test]
fn test_bad_cutoff_date_fails_cleanly() -> Result<()> {
    let env = CdmqcTestEnv::new()?;

    env.cdmqc()
        .args(["checks", "--schema", "CDM_2025", "--cutoff", "06/01/2025"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid date"));
    Ok(())
}

#[tokio::test]
async fn test_adhoc_query_prints_rows() -> Result<()> {
    let env = CdmqcTestEnv::new()?;
    env.seed("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (42)")
        .await?;

    env.cdmqc()
        .args(["query", "SELECT n FROM t"])
        .arg("--db-path")
        .arg(&env.db_path)
        .assert()
        .success()
        .stdout(predicates::str::contains("42"));
    Ok(())
}
