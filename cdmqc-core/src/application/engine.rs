// cdmqc-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::error::CdmqcError;
use crate::ports::connector::{Connector, Record, SqlValue};

/// Runs one report query with instrumentation (logs + timing). Every section
/// goes through this wrapper so slow checks show up in the traces.
#[instrument(skip(connector, query, params), fields(query.len = query.len(), params.len = params.len()))]
pub async fn run_query(
    connector: &dyn Connector,
    query: &str,
    params: &[SqlValue],
) -> Result<Vec<Record>, CdmqcError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    let result = connector.query(query, params).await;

    let duration = start.elapsed();

    match result {
        Ok(records) => {
            debug!("✅ Query returned {} row(s) in {:.2?}", records.len(), duration);
            Ok(records)
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
