// cdmqc-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CdmqcError {
    // --- DOMAIN ERRORS (Catalogue, identifiers, date windows) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Database, Templates) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATIVE ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementations to avoid duplicate enum variants but keep ergonomics
impl From<std::io::Error> for CdmqcError {
    fn from(err: std::io::Error) -> Self {
        CdmqcError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for CdmqcError {
    fn from(err: duckdb::Error) -> Self {
        CdmqcError::Infrastructure(InfrastructureError::from(err))
    }
}
