// cdmqc-core/src/ports/connector.rs

// This file defines what the application needs from a warehouse, without
// knowing how it is done. The report sections only ever see ordered rows of
// named values coming back from this port.

use crate::error::CdmqcError;
use async_trait::async_trait;

/// A scalar value crossing the warehouse boundary, in either direction:
/// bound as a statement parameter on the way in, read from a result column
/// on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(v) => Some(*v),
            SqlValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// One result row: named fields in the order the query projected them.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new(fields: Vec<(String, SqlValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Integer column, NULL mapped to 0 (aggregates over empty sets).
    pub fn count(&self, name: &str) -> i64 {
        self.get(name).and_then(SqlValue::as_i64).unwrap_or(0)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SqlValue::as_str)
    }

    pub fn fields(&self) -> &[(String, SqlValue)] {
        &self.fields
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Executes a statement that produces no result set (DDL, inserts).
    async fn execute(&self, sql: &str) -> Result<(), CdmqcError>;

    /// Runs a query and collects the full result set. Literal values (dates,
    /// thresholds) are bound through `params`; identifiers are rendered into
    /// `sql` upstream, validated against the catalogue.
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, CdmqcError>;

    /// Schemas whose name starts with `prefix` (snapshot discovery).
    async fn list_schemas(&self, prefix: &str) -> Result<Vec<String>, CdmqcError>;

    /// Tables present in a schema, upper-cased. Sections use this to skip
    /// catalogue tables a given snapshot does not carry.
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, CdmqcError>;

    fn engine_name(&self) -> &str;
}
