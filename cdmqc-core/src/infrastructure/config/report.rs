// cdmqc-core/src/infrastructure/config/report.rs
//
// Warehouse connection settings. Loaded from `cdmqc.yaml` in the working
// directory when present, with environment overrides layered on top so a
// one-off run can point elsewhere without editing the file.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_FILE: &str = "cdmqc.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// DuckDB database file, or ":memory:".
    pub db_path: String,
    /// Schemas starting with this prefix are offered as report snapshots.
    pub schema_prefix: String,
    /// Years before the cutoff date covered by the windowed checks.
    pub lookback_years: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "cdmqc.duckdb".to_string(),
            schema_prefix: "CDM".to_string(),
            lookback_years: crate::domain::dates::LOOKBACK_YEARS,
        }
    }
}

#[instrument(skip(dir))]
pub fn load_config(dir: &Path) -> Result<AppConfig, InfrastructureError> {
    let path = dir.join(CONFIG_FILE);

    let mut config = if path.exists() {
        info!(path = ?path, "Loading report configuration");
        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("CDMQC_DB_PATH") {
        info!(old = ?config.db_path, new = ?val, "Overriding database path via ENV");
        config.db_path = val;
    }
    if let Ok(val) = std::env::var("CDMQC_SCHEMA_PREFIX") {
        info!(old = ?config.schema_prefix, new = ?val, "Overriding schema prefix via ENV");
        config.schema_prefix = val;
    }
}
