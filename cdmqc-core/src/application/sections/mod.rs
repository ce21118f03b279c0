// cdmqc-core/src/application/sections/mod.rs
//
// Report sections. Each function takes validated schema names, runs its
// catalogue-driven queries through the template engine and the connector
// port, and returns a presentation-ready ReportTable with highlights already
// classified. Catalogue tables absent from the target schema are skipped
// silently: a thin test warehouse is a valid input, not an error.

pub mod cohorts;
pub mod demographics;
pub mod integrity;
pub mod persistence;
pub mod trend;

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::application::engine::run_query;
use crate::application::ports::TemplateEngine;
use crate::error::CdmqcError;
use crate::infrastructure::sql::ensure_identifier;
use crate::ports::connector::{Connector, Record, SqlValue};

/// Everything a section needs to run: the warehouse port and the SQL
/// template engine. Sections never touch the database driver directly.
pub struct ReportContext<'a> {
    pub connector: &'a dyn Connector,
    pub templates: &'a dyn TemplateEngine,
}

impl<'a> ReportContext<'a> {
    pub fn new(connector: &'a dyn Connector, templates: &'a dyn TemplateEngine) -> Self {
        Self {
            connector,
            templates,
        }
    }

    /// Renders a template and runs the resulting query.
    pub(crate) async fn fetch(
        &self,
        template: &str,
        context: &Value,
        params: &[SqlValue],
    ) -> Result<Vec<Record>, CdmqcError> {
        let sql = self.templates.render(template, context)?;
        run_query(self.connector, &sql, params).await
    }

    /// Same, for queries that project exactly one row (aggregates).
    pub(crate) async fn fetch_one(
        &self,
        template: &str,
        context: &Value,
        params: &[SqlValue],
    ) -> Result<Record, CdmqcError> {
        let mut records = self.fetch(template, context, params).await?;
        if records.is_empty() {
            return Err(CdmqcError::InternalError(
                "Aggregate query returned no rows".into(),
            ));
        }
        Ok(records.swap_remove(0))
    }

    /// Validates the schema name and returns the set of tables it holds.
    pub(crate) async fn tables_in(&self, schema: &str) -> Result<HashSet<String>, CdmqcError> {
        ensure_identifier(schema)?;
        Ok(self
            .connector
            .list_tables(schema)
            .await?
            .into_iter()
            .collect())
    }
}

/// Dates cross the wire as ISO-8601 text bound to `CAST(? AS DATE)`.
pub(crate) fn date_param(date: NaiveDate) -> SqlValue {
    SqlValue::Text(date.format("%Y-%m-%d").to_string())
}
