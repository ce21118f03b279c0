// cdmqc/src/commands/mod.rs

pub mod checks;
pub mod describe;
pub mod persistence;
pub mod query;
pub mod schemas;
pub mod summary;
pub mod trend;

use anyhow::Context;
use chrono::NaiveDate;

/// Parses a YYYY-MM-DD argument, defaulting to today.
pub fn parse_date_or_today(value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match value {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}
