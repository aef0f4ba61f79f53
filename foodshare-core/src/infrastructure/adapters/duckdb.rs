// foodshare-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta};
use duckdb::types::{TimeUnit, ToSqlOutput, Value};
use duckdb::{Config, Connection, ToSql, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

// Imports Hexagonaux
use crate::domain::report::{Cell, ResultSet};
use crate::error::FoodshareError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector};

pub const IN_MEMORY: &str = ":memory:";

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    /// Opens (or creates) the store. The parent directory is created if missing.
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let open_failure = |source| DatabaseError::ConnectionFailure {
            path: db_path.to_string(),
            source,
        };

        let conn = if db_path == IN_MEMORY {
            Connection::open_in_memory_with_flags(Config::default()).map_err(open_failure)?
        } else {
            if let Some(parent) = Path::new(db_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open_with_flags(db_path, Config::default()).map_err(open_failure)?
        };

        info!(path = db_path, "🦆 DuckDB store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(IN_MEMORY)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, FoodshareError> {
        self.conn
            .lock()
            .map_err(|_| FoodshareError::from(DatabaseError::Poisoned))
    }
}

fn run_query(conn: &Connection, sql: &str, params: &[Cell]) -> Result<ResultSet, duckdb::Error> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(params.iter()))?;

    let mut data = Vec::new();
    while let Some(row) = rows.next()? {
        let width = row.as_ref().column_count();
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(to_cell(row.get::<_, Value>(idx)?));
        }
        data.push(cells);
    }
    drop(rows);

    // Column metadata is only available once the statement has run
    Ok(ResultSet {
        columns: stmt.column_names(),
        rows: data,
    })
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, sql: &str) -> Result<u64, FoodshareError> {
        let conn = self.lock()?;
        let affected = conn.execute(sql, [])?;
        Ok(affected as u64)
    }

    async fn query(&self, sql: &str, params: &[Cell]) -> Result<ResultSet, FoodshareError> {
        let conn = self.lock()?;
        Ok(run_query(&conn, sql, params)?)
    }

    async fn query_scalar(&self, sql: &str) -> Result<i64, FoodshareError> {
        let result = {
            let conn = self.lock()?;
            run_query(&conn, sql, &[])?
        };

        match result.rows.first().and_then(|r| r.first()) {
            Some(Cell::Null) => Ok(0),
            Some(cell) => cell
                .as_i64()
                .ok_or_else(|| FoodshareError::InternalError(format!("Non-integer scalar: {}", cell))),
            None => Err(FoodshareError::InternalError("No scalar value returned".into())),
        }
    }

    async fn bulk_insert(&self, sql: &str, rows: &[Vec<Cell>]) -> Result<u64, FoodshareError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut inserted = 0u64;
        {
            let mut stmt = tx.prepare(sql)?;
            for row in rows {
                inserted += stmt.execute(params_from_iter(row.iter()))? as u64;
            }
        }
        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;

        debug!(rows = inserted, "Batch committed");
        Ok(inserted)
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, FoodshareError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "PRAGMA table_info('{}')",
            table_name.replace('\'', "''")
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    async fn list_tables(&self) -> Result<Vec<String>, FoodshareError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE' ORDER BY table_name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tables = Vec::new();
        for row in rows {
            tables.push(row?);
        }
        Ok(tables)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

// --- VALUE MAPPING ---

impl ToSql for Cell {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            Cell::Null => Value::Null,
            Cell::Bool(v) => Value::Boolean(*v),
            Cell::Int(v) => Value::BigInt(*v),
            Cell::Float(v) => Value::Double(*v),
            Cell::Text(v) => Value::Text(v.clone()),
            // Temporal values travel as ISO text; statements CAST them
            Cell::Date(_) | Cell::Timestamp(_) => Value::Text(self.to_string()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Boolean(v) => Cell::Bool(v),
        Value::TinyInt(v) => Cell::Int(v.into()),
        Value::SmallInt(v) => Cell::Int(v.into()),
        Value::Int(v) => Cell::Int(v.into()),
        Value::BigInt(v) => Cell::Int(v),
        Value::UTinyInt(v) => Cell::Int(v.into()),
        Value::USmallInt(v) => Cell::Int(v.into()),
        Value::UInt(v) => Cell::Int(v.into()),
        Value::UBigInt(v) => i64::try_from(v).map_or(Cell::Float(v as f64), Cell::Int),
        Value::HugeInt(v) => i64::try_from(v).map_or(Cell::Float(v as f64), Cell::Int),
        Value::Float(v) => Cell::Float(v.into()),
        Value::Double(v) => Cell::Float(v),
        Value::Decimal(v) => {
            let text = v.to_string();
            text.parse::<f64>().map_or(Cell::Text(text), Cell::Float)
        }
        Value::Text(v) => Cell::Text(v),
        Value::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(TimeDelta::days(days.into())))
            .map_or(Cell::Null, Cell::Date),
        Value::Timestamp(unit, v) => {
            let micros = match unit {
                TimeUnit::Second => v.saturating_mul(1_000_000),
                TimeUnit::Millisecond => v.saturating_mul(1_000),
                TimeUnit::Microsecond => v,
                TimeUnit::Nanosecond => v / 1_000,
            };
            DateTime::from_timestamp_micros(micros).map_or(Cell::Null, |dt| Cell::Timestamp(dt.naive_utc()))
        }
        other => Cell::Text(format!("{:?}", other)),
    }
}
