// foodshare-core/src/ports/connector.rs

// What the application needs from a relational store, without knowing which engine answers.

use crate::domain::report::{Cell, ResultSet};
use crate::error::FoodshareError;
use async_trait::async_trait;
use serde::Serialize;

// Description d'une colonne (indépendante de la DB)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs one statement, returns the number of affected rows.
    async fn execute(&self, sql: &str) -> Result<u64, FoodshareError>;

    /// Runs a read with positional `?` parameters.
    async fn query(&self, sql: &str, params: &[Cell]) -> Result<ResultSet, FoodshareError>;

    /// First column of the first row, as an integer.
    async fn query_scalar(&self, sql: &str) -> Result<i64, FoodshareError>;

    /// Executes `sql` once per row inside a single transaction.
    /// Any failure rolls back the whole batch.
    async fn bulk_insert(&self, sql: &str, rows: &[Vec<Cell>]) -> Result<u64, FoodshareError>;

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, FoodshareError>;

    async fn list_tables(&self) -> Result<Vec<String>, FoodshareError>;

    fn engine_name(&self) -> &str;
}
