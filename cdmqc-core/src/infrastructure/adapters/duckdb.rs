// cdmqc-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CdmqcError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{Connector, Record, SqlValue};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CdmqcError> {
        self.conn.lock().map_err(|_| {
            CdmqcError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }

    fn db_err(e: duckdb::Error) -> CdmqcError {
        CdmqcError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(e)))
    }

    fn read_value(value: ValueRef<'_>) -> SqlValue {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Boolean(b) => SqlValue::Int(i64::from(b)),
            ValueRef::TinyInt(i) => SqlValue::Int(i64::from(i)),
            ValueRef::SmallInt(i) => SqlValue::Int(i64::from(i)),
            ValueRef::Int(i) => SqlValue::Int(i64::from(i)),
            ValueRef::BigInt(i) => SqlValue::Int(i),
            ValueRef::HugeInt(i) => SqlValue::Int(i as i64),
            ValueRef::UTinyInt(i) => SqlValue::Int(i64::from(i)),
            ValueRef::USmallInt(i) => SqlValue::Int(i64::from(i)),
            ValueRef::UInt(i) => SqlValue::Int(i64::from(i)),
            ValueRef::UBigInt(i) => SqlValue::Int(i as i64),
            ValueRef::Float(f) => SqlValue::Float(f64::from(f)),
            ValueRef::Double(f) => SqlValue::Float(f),
            ValueRef::Decimal(d) => SqlValue::Float(d.to_string().parse().unwrap_or(0.0)),
            ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            // The report queries only ever read counts, percents and labels;
            // anything exotic degrades to its debug form.
            other => SqlValue::Text(format!("{other:?}")),
        }
    }

    fn bind_value(value: &SqlValue) -> duckdb::types::Value {
        match value {
            SqlValue::Null => duckdb::types::Value::Null,
            SqlValue::Int(i) => duckdb::types::Value::BigInt(*i),
            SqlValue::Float(f) => duckdb::types::Value::Double(*f),
            SqlValue::Text(s) => duckdb::types::Value::Text(s.clone()),
        }
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), CdmqcError> {
        let conn = self.lock()?;
        conn.execute_batch(query).map_err(Self::db_err)
    }

    async fn query(&self, query: &str, params: &[SqlValue]) -> Result<Vec<Record>, CdmqcError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(Self::db_err)?;

        let bound: Vec<duckdb::types::Value> = params.iter().map(Self::bind_value).collect();
        let mut rows = stmt
            .query(duckdb::params_from_iter(bound))
            .map_err(Self::db_err)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(Self::db_err)? {
            let stmt = row.as_ref();
            let names = stmt.column_names();
            let mut fields = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let value = row.get_ref(idx).map_err(Self::db_err)?;
                fields.push((name.to_string(), Self::read_value(value)));
            }
            records.push(Record::new(fields));
        }

        Ok(records)
    }

    async fn list_schemas(&self, prefix: &str) -> Result<Vec<String>, CdmqcError> {
        let records = self
            .query(
                "SELECT schema_name FROM information_schema.schemata \
                 WHERE schema_name ILIKE ? ORDER BY schema_name",
                &[SqlValue::Text(format!("{prefix}%"))],
            )
            .await?;

        Ok(records
            .iter()
            .filter_map(|r| r.text("schema_name"))
            .map(ToOwned::to_owned)
            .collect())
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, CdmqcError> {
        let records = self
            .query(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema ILIKE ? ORDER BY table_name",
                &[SqlValue::Text(schema.to_string())],
            )
            .await?;

        Ok(records
            .iter()
            .filter_map(|r| r.text("table_name"))
            .map(|t| t.to_uppercase())
            .collect())
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}
