// foodshare-core/src/application/schema.rs

use serde::Serialize;
use tracing::{info, instrument};

use crate::application::engine::execute_query;
use crate::domain::error::DomainError;
use crate::domain::schema::{INDEXES, TableName};
use crate::error::FoodshareError;
use crate::ports::connector::{ColumnSchema, Connector};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub table: TableName,
    /// `None` when the table does not exist.
    pub columns: Option<Vec<ColumnSchema>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableCount {
    pub table: TableName,
    /// `None` when the table does not exist.
    pub rows: Option<i64>,
}

/// Creates, drops and inspects the four managed tables.
pub struct SchemaManager<'a> {
    connector: &'a dyn Connector,
}

impl<'a> SchemaManager<'a> {
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self { connector }
    }

    /// Tables in dependency order, then indexes. Safe on an initialized store.
    #[instrument(skip(self))]
    pub async fn create_all(&self) -> Result<(), FoodshareError> {
        for table in TableName::LOAD_ORDER {
            execute_query(self.connector, table.create_sql()).await?;
            info!("✅ Table '{}' ready", table);
        }
        for index in INDEXES {
            execute_query(self.connector, index).await?;
        }
        info!("✅ {} indexes ready", INDEXES.len());
        Ok(())
    }

    /// Children first so no foreign key is left dangling.
    #[instrument(skip(self))]
    pub async fn drop_all(&self) -> Result<(), FoodshareError> {
        for table in TableName::DROP_ORDER {
            execute_query(self.connector, &table.drop_sql()).await?;
            info!("🗑️  Dropped '{}'", table);
        }
        Ok(())
    }

    pub async fn missing_tables(&self) -> Result<Vec<TableName>, FoodshareError> {
        let existing = self.connector.list_tables().await?;
        Ok(TableName::LOAD_ORDER
            .into_iter()
            .filter(|t| !existing.iter().any(|e| e == t.name()))
            .collect())
    }

    /// Fails with a schema error naming every missing table.
    pub async fn ensure_ready(&self) -> Result<(), FoodshareError> {
        let missing = self.missing_tables().await?;
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(TableName::name).collect();
        Err(DomainError::SchemaError(format!("missing tables: {}", names.join(", "))).into())
    }

    pub async fn describe(&self) -> Result<Vec<TableDescription>, FoodshareError> {
        let missing = self.missing_tables().await?;
        let mut descriptions = Vec::with_capacity(TableName::LOAD_ORDER.len());
        for table in TableName::LOAD_ORDER {
            let columns = if missing.contains(&table) {
                None
            } else {
                Some(self.connector.fetch_columns(table.name()).await?)
            };
            descriptions.push(TableDescription { table, columns });
        }
        Ok(descriptions)
    }

    pub async fn row_counts(&self) -> Result<Vec<TableCount>, FoodshareError> {
        let missing = self.missing_tables().await?;
        let mut counts = Vec::with_capacity(TableName::LOAD_ORDER.len());
        for table in TableName::LOAD_ORDER {
            let rows = if missing.contains(&table) {
                None
            } else {
                Some(self.connector.query_scalar(&table.count_sql()).await?)
            };
            counts.push(TableCount { table, rows });
        }
        Ok(counts)
    }
}
