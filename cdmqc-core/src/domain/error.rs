// cdmqc-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid SQL identifier: '{0}'")]
    #[diagnostic(
        code(cdmqc::domain::identifier),
        help("Schema, table and column names must match [A-Za-z_][A-Za-z0-9_]*.")
    )]
    InvalidIdentifier(String),

    #[error("Table '{0}' has no temporal column registered in the catalogue")]
    #[diagnostic(code(cdmqc::domain::no_temporal_column))]
    NoTemporalColumn(String),

    #[error("Table '{0}' is not part of the CDM catalogue")]
    #[diagnostic(code(cdmqc::domain::table_not_found))]
    TableNotFound(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    #[diagnostic(code(cdmqc::domain::date_range))]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
