// foodshare-core/src/application/ingestion.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use crate::application::integrity::verify_integrity;
use crate::application::schema::SchemaManager;
use crate::domain::clock::Clock;
use crate::domain::entity::{Claim, FoodListing, Provider, Receiver, TableRecord};
use crate::domain::error::DomainError;
use crate::domain::integrity::IntegrityReport;
use crate::domain::project::SourceFiles;
use crate::domain::report::Cell;
use crate::domain::schema::TableName;
use crate::error::FoodshareError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::write_json;
use crate::infrastructure::sources::{RejectedRecord, locate_source, read_records};
use crate::ports::connector::Connector;

pub const RESULTS_FILE: &str = "load_results.json";

// --- OUTCOMES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The engine rejected the batch on a PK / FK / CHECK constraint.
    Integrity,
    /// The source file exists but could not be read.
    Source,
    /// Left untouched: a table outside this load still references its rows.
    Blocked,
    /// Any other store failure.
    Store,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded { rows: i64 },
    MissingSource { path: String },
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLoad {
    pub table: TableName,
    pub source: String,
    pub valid_records: usize,
    pub rejected: Vec<RejectedRecord>,
    #[serde(flatten)]
    pub status: LoadStatus,
}

impl TableLoad {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded { .. })
    }

    pub fn rows(&self) -> Option<i64> {
        match self.status {
            LoadStatus::Loaded { rows } => Some(rows),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionReport {
    pub generated_at: NaiveDateTime,
    pub tables: Vec<TableLoad>,
    pub missing_sources: Vec<String>,
    pub integrity: IntegrityReport,
    pub guidance: Vec<String>,
}

impl IngestionReport {
    pub fn table(&self, table: TableName) -> Option<&TableLoad> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn loaded_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_loaded()).count()
    }

    /// "3/4 tables loaded"
    pub fn summary(&self) -> String {
        format!("{}/{} tables loaded", self.loaded_count(), TableName::LOAD_ORDER.len())
    }

    /// Every table loaded, nothing rejected, integrity clean.
    pub fn is_success(&self) -> bool {
        self.loaded_count() == TableName::LOAD_ORDER.len()
            && self.tables.iter().all(|t| t.rejected.is_empty())
            && self.integrity.is_clean()
    }

    pub fn row_counts(&self) -> BTreeMap<TableName, i64> {
        self.tables
            .iter()
            .filter_map(|t| t.rows().map(|rows| (t.table, rows)))
            .collect()
    }

    /// Writes the report as `<target_dir>/load_results.json`.
    pub fn persist(&self, target_dir: &Path) -> Result<PathBuf, InfrastructureError> {
        let path = target_dir.join(RESULTS_FILE);
        write_json(&path, self)?;
        Ok(path)
    }
}

// --- PIPELINE ---

/// A source parsed and ready to be written.
struct Staged {
    table: TableName,
    source: String,
    rows: Vec<Vec<Cell>>,
    rejected: Vec<RejectedRecord>,
}

pub struct IngestionPipeline<'a> {
    connector: &'a dyn Connector,
    data_dir: PathBuf,
    sources: SourceFiles,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(connector: &'a dyn Connector, data_dir: &Path, sources: SourceFiles) -> Self {
        Self {
            connector,
            data_dir: data_dir.to_path_buf(),
            sources,
        }
    }

    /// Replaces the content of every table that has a readable source.
    ///
    /// Only store-level failures before any table is touched (schema creation)
    /// are returned as errors; everything after that becomes part of the report.
    #[instrument(skip(self, clock), fields(data_dir = %self.data_dir.display()))]
    pub async fn run(&self, clock: &dyn Clock) -> Result<IngestionReport, FoodshareError> {
        info!("🚀 Starting ingestion");
        SchemaManager::new(self.connector).create_all().await?;

        // 1. Locate + parse
        let mut outcomes: BTreeMap<TableName, TableLoad> = BTreeMap::new();
        let mut staged: Vec<Staged> = Vec::new();
        let mut missing_sources = Vec::new();

        for table in TableName::LOAD_ORDER {
            let file_name = self.sources.for_table(table);
            let Some(path) = locate_source(&self.data_dir, file_name) else {
                let path = self.data_dir.join(file_name).display().to_string();
                warn!("⚠️  {}", DomainError::MissingSource { table: table.to_string(), path: path.clone() });
                missing_sources.push(file_name.to_string());
                outcomes.insert(table, pending(table, file_name, LoadStatus::MissingSource { path }));
                continue;
            };

            match parse_source(table, &path) {
                Ok((rows, rejected)) => {
                    info!("📄 {}: {} valid, {} rejected", file_name, rows.len(), rejected.len());
                    staged.push(Staged {
                        table,
                        source: path.display().to_string(),
                        rows,
                        rejected,
                    });
                }
                Err(e) => {
                    error!("❌ Cannot read {}: {}", path.display(), e);
                    let status = LoadStatus::Failed {
                        kind: FailureKind::Source,
                        message: e.to_string(),
                    };
                    outcomes.insert(table, pending(table, &path.display().to_string(), status));
                }
            }
        }

        // 2. Clear, children first (the engine checks foreign keys on delete)
        for table in TableName::DROP_ORDER {
            let Some(idx) = staged.iter().position(|s| s.table == table) else {
                continue;
            };
            match self.holding_dependent(table, &staged).await? {
                Some((child, rows)) => {
                    let item = staged.remove(idx);
                    let message = format!(
                        "{} row(s) of '{}' still reference it and are not being reloaded",
                        rows, child
                    );
                    warn!("⚠️  Keeping '{}': {}", table, message);
                    outcomes.insert(table, with_status(item, FailureKind::Blocked, message));
                }
                None => {
                    if let Err(e) = self.connector.execute(&table.clear_sql()).await {
                        let item = staged.remove(idx);
                        error!("❌ Cannot clear '{}': {}", table, e);
                        outcomes.insert(table, failed(item, e));
                    }
                }
            }
        }

        // 3. Insert, parents first, one transaction per table
        for item in staged {
            let table = item.table;
            let status = match self.load_table(&item).await {
                Ok(rows) => {
                    info!("✅ {} loaded: {} rows", table, rows);
                    TableLoad {
                        table,
                        source: item.source,
                        valid_records: item.rows.len(),
                        rejected: item.rejected,
                        status: LoadStatus::Loaded { rows },
                    }
                }
                Err(e) => failed(item, e),
            };
            outcomes.insert(table, status);
        }

        // 4. Advisory integrity pass
        let integrity = verify_integrity(self.connector).await;

        let tables: Vec<TableLoad> = outcomes.into_values().collect();
        let guidance = guidance(&tables, &integrity, &self.data_dir);
        let report = IngestionReport {
            generated_at: clock.now(),
            tables,
            missing_sources,
            integrity,
            guidance,
        };

        info!("🏁 Ingestion finished: {}", report.summary());
        Ok(report)
    }

    /// First dependent table that keeps rows while not being reloaded.
    async fn holding_dependent(
        &self,
        table: TableName,
        staged: &[Staged],
    ) -> Result<Option<(TableName, i64)>, FoodshareError> {
        for child in table.dependents() {
            if staged.iter().any(|s| s.table == *child) {
                continue;
            }
            let rows = self.connector.query_scalar(&child.count_sql()).await?;
            if rows > 0 {
                return Ok(Some((*child, rows)));
            }
        }
        Ok(None)
    }

    async fn load_table(&self, item: &Staged) -> Result<i64, FoodshareError> {
        self.connector
            .bulk_insert(&item.table.insert_sql(), &item.rows)
            .await?;
        self.connector.query_scalar(&item.table.count_sql()).await
    }
}

fn parse_source(
    table: TableName,
    path: &Path,
) -> Result<(Vec<Vec<Cell>>, Vec<RejectedRecord>), InfrastructureError> {
    match table {
        TableName::Providers => rows_of::<Provider>(path),
        TableName::Receivers => rows_of::<Receiver>(path),
        TableName::FoodListings => rows_of::<FoodListing>(path),
        TableName::Claims => rows_of::<Claim>(path),
    }
}

fn rows_of<T: TableRecord>(
    path: &Path,
) -> Result<(Vec<Vec<Cell>>, Vec<RejectedRecord>), InfrastructureError> {
    let batch = read_records::<T>(path)?;
    let rows = batch.records.iter().map(TableRecord::to_row).collect();
    Ok((rows, batch.rejected))
}

fn pending(table: TableName, source: &str, status: LoadStatus) -> TableLoad {
    TableLoad {
        table,
        source: source.to_string(),
        valid_records: 0,
        rejected: Vec::new(),
        status,
    }
}

fn failed(item: Staged, e: FoodshareError) -> TableLoad {
    let (kind, message) = if e.is_constraint_violation() {
        let violation = DomainError::IntegrityViolation {
            table: item.table.to_string(),
            detail: e.to_string(),
        };
        error!("❌ {}", violation);
        (FailureKind::Integrity, violation.to_string())
    } else {
        error!("❌ Loading '{}' failed: {}", item.table, e);
        (FailureKind::Store, e.to_string())
    };
    with_status(item, kind, message)
}

fn with_status(item: Staged, kind: FailureKind, message: String) -> TableLoad {
    TableLoad {
        table: item.table,
        source: item.source,
        valid_records: item.rows.len(),
        rejected: item.rejected,
        status: LoadStatus::Failed { kind, message },
    }
}

/// One actionable line per problem, naming the step to rerun.
fn guidance(tables: &[TableLoad], integrity: &IntegrityReport, data_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for load in tables {
        match &load.status {
            LoadStatus::MissingSource { path } => lines.push(format!(
                "Add '{}' under {} then rerun `foodshare load`.",
                Path::new(path).file_name().map_or(path.clone(), |n| n.to_string_lossy().into_owned()),
                data_dir.display()
            )),
            LoadStatus::Failed { kind: FailureKind::Integrity, .. } => lines.push(format!(
                "Fix the references in {} (every id must exist in its parent table) then rerun `foodshare load`.",
                load.source
            )),
            LoadStatus::Failed { kind: FailureKind::Source, .. } => lines.push(format!(
                "Repair {} (header row and comma separated fields) then rerun `foodshare load`.",
                load.source
            )),
            LoadStatus::Failed { kind: FailureKind::Blocked, message } => lines.push(format!(
                "'{}' was left unchanged ({}); provide its dependent sources too, then rerun `foodshare load`.",
                load.table, message
            )),
            LoadStatus::Failed { kind: FailureKind::Store, message } => lines.push(format!(
                "The store rejected the rows of {}: {}. Correct those values then rerun `foodshare load`.",
                load.source, message
            )),
            LoadStatus::Loaded { .. } => {}
        }

        if !load.rejected.is_empty() {
            let sample: Vec<String> = load.rejected.iter().take(5).map(|r| r.line.to_string()).collect();
            lines.push(format!(
                "{} record(s) of {} were skipped (lines {}); fix them and rerun `foodshare load`.",
                load.rejected.len(),
                load.source,
                sample.join(", ")
            ));
        }
    }

    for finding in integrity.violations() {
        lines.push(format!(
            "Integrity check '{}' found {} violation(s) (ids {:?}); run `foodshare verify` after fixing the sources.",
            finding.check, finding.violations, finding.sample_ids
        ));
    }

    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::infrastructure::adapters::DuckDBConnector;
    use anyhow::Result;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_full_load_matches_valid_records() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_standard_sources(dir.path())?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, dir.path()).await?;

        assert!(report.is_success(), "guidance: {:?}", report.guidance);
        assert_eq!(report.summary(), "4/4 tables loaded");
        for load in &report.tables {
            assert_eq!(load.rows(), Some(load.valid_records as i64), "{}", load.table);
        }
        assert_eq!(report.row_counts()[&TableName::Claims], 6);
        assert!(report.guidance.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_standard_sources(dir.path())?;
        let connector = DuckDBConnector::in_memory()?;

        let snapshot = "SELECT c.claim_id, c.status, f.food_name, r.name FROM claims c \
                        JOIN food_listings f USING (food_id) JOIN receivers r USING (receiver_id) \
                        ORDER BY c.claim_id";

        let first = fixtures::ingest(&connector, dir.path()).await?;
        let before = connector.query(snapshot, &[]).await?;
        let second = fixtures::ingest(&connector, dir.path()).await?;
        let after = connector.query(snapshot, &[]).await?;

        assert_eq!(first.row_counts(), second.row_counts());
        assert_eq!(before, after);
        assert_eq!(after.len(), 6);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_receiver_fails_claims_only() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_sources(
            dir.path(),
            &[
                (TableName::Providers, "provider_id,name,type,address,city,contact\n1,Green Deli,Restaurant,12 Main St,Metro,x\n"),
                (TableName::Receivers, "receiver_id,name,type,city,contact\n"),
                (
                    TableName::FoodListings,
                    "food_id,food_name,quantity,expiry_date,provider_id,provider_type,location,food_type,meal_type\n\
                     10,Bread,5,2099-01-01,1,Restaurant,Metro,Vegan,Lunch\n",
                ),
                (TableName::Claims, "claim_id,food_id,receiver_id,status,timestamp\n100,10,42,Pending,2025-03-05 05:26:00\n"),
            ],
        )?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, dir.path()).await?;

        assert_eq!(report.table(TableName::Providers).and_then(TableLoad::rows), Some(1));
        assert_eq!(report.table(TableName::FoodListings).and_then(TableLoad::rows), Some(1));

        let claims = report.table(TableName::Claims).unwrap();
        assert!(matches!(
            claims.status,
            LoadStatus::Failed { kind: FailureKind::Integrity, .. }
        ));
        assert_eq!(connector.query_scalar("SELECT COUNT(*) FROM claims").await?, 0);
        assert_eq!(report.summary(), "3/4 tables loaded");
        assert!(report.guidance.iter().any(|g| g.contains("claims_data.csv")));
        assert!(!report.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_only_skips_that_table() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_sources(
            dir.path(),
            &[
                (TableName::Providers, fixtures::PROVIDERS),
                (TableName::Receivers, fixtures::RECEIVERS),
                (TableName::FoodListings, fixtures::FOOD_LISTINGS),
            ],
        )?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, dir.path()).await?;

        assert_eq!(report.missing_sources, vec!["claims_data.csv".to_string()]);
        assert!(matches!(
            report.table(TableName::Claims).unwrap().status,
            LoadStatus::MissingSource { .. }
        ));
        assert_eq!(report.loaded_count(), 3);
        assert!(report.guidance[0].contains("claims_data.csv"));
        Ok(())
    }

    #[tokio::test]
    async fn test_parent_with_unreloaded_children_is_not_cleared() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_standard_sources(dir.path())?;
        let connector = DuckDBConnector::in_memory()?;
        fixtures::ingest(&connector, dir.path()).await?;

        // Second run without a claims file: existing claims still point at receivers
        std::fs::remove_file(dir.path().join("claims_data.csv"))?;
        let report = fixtures::ingest(&connector, dir.path()).await?;

        for parent in [TableName::Receivers, TableName::FoodListings, TableName::Providers] {
            assert!(
                matches!(
                    report.table(parent).unwrap().status,
                    LoadStatus::Failed { kind: FailureKind::Blocked, .. }
                ),
                "{} should be kept",
                parent
            );
        }
        assert_eq!(connector.query_scalar("SELECT COUNT(*) FROM receivers").await?, 4);
        assert_eq!(connector.query_scalar("SELECT COUNT(*) FROM claims").await?, 6);
        assert!(report.guidance.iter().any(|g| g.contains("6 row(s) of 'claims'")));
        assert!(report.guidance.iter().all(|g| !g.contains("--reset")));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_rows_are_reported_and_not_loaded() -> Result<()> {
        let dir = tempdir()?;
        let listings = format!(
            "{}15,Mystery Box,-3,2025-03-20,1,Restaurant,Metro,Vegan,Lunch\n",
            fixtures::FOOD_LISTINGS
        );
        fixtures::write_sources(
            dir.path(),
            &[
                (TableName::Providers, fixtures::PROVIDERS),
                (TableName::Receivers, fixtures::RECEIVERS),
                (TableName::FoodListings, &listings),
                (TableName::Claims, fixtures::CLAIMS),
            ],
        )?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, dir.path()).await?;
        let load = report.table(TableName::FoodListings).unwrap();

        assert_eq!(load.rows(), Some(5));
        assert_eq!(load.rejected.len(), 1);
        assert_eq!(load.rejected[0].line, 7);
        assert_eq!(report.loaded_count(), 4);
        assert!(!report.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_quantity_rejects_only_that_row() -> Result<()> {
        let dir = tempdir()?;
        let listings = format!(
            "{}16,Big Crate,4000000000,2025-03-20,1,Restaurant,Metro,Vegan,Lunch\n",
            fixtures::FOOD_LISTINGS
        );
        fixtures::write_sources(
            dir.path(),
            &[
                (TableName::Providers, fixtures::PROVIDERS),
                (TableName::Receivers, fixtures::RECEIVERS),
                (TableName::FoodListings, &listings),
                (TableName::Claims, fixtures::CLAIMS),
            ],
        )?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, dir.path()).await?;
        let load = report.table(TableName::FoodListings).unwrap();

        assert_eq!(load.rows(), Some(5));
        assert_eq!(load.rejected.len(), 1);
        assert_eq!(load.rejected[0].line, 7);
        assert_eq!(report.table(TableName::Claims).and_then(TableLoad::rows), Some(6));
        assert_eq!(report.summary(), "4/4 tables loaded");
        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_names_source_and_engine_message() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_standard_sources(dir.path())?;
        let connector = DuckDBConnector::in_memory()?;
        // Contacts like "555-0101" cannot be converted into this column
        connector
            .execute(
                "CREATE TABLE providers (provider_id INTEGER PRIMARY KEY, name VARCHAR, type VARCHAR, \
                 address VARCHAR, city VARCHAR, contact INTEGER)",
            )
            .await?;

        let report = fixtures::ingest(&connector, dir.path()).await?;
        let providers = report.table(TableName::Providers).unwrap();
        let LoadStatus::Failed { kind, message } = &providers.status else {
            panic!("providers should fail, got {:?}", providers.status);
        };
        assert_eq!(*kind, FailureKind::Store);

        let line = report
            .guidance
            .iter()
            .find(|g| g.starts_with("The store rejected"))
            .unwrap();
        assert!(line.contains("providers_data.csv"));
        assert!(line.contains(message.as_str()));
        assert!(!line.contains("--reset"));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_is_persisted_as_json() -> Result<()> {
        let dir = tempdir()?;
        fixtures::write_standard_sources(&dir.path().join("data"))?;
        let connector = DuckDBConnector::in_memory()?;

        let report = fixtures::ingest(&connector, &dir.path().join("data")).await?;
        let path = report.persist(&dir.path().join("target"))?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(json["tables"][0]["table"], "providers");
        assert_eq!(json["tables"][0]["status"], "loaded");
        assert_eq!(json["tables"][3]["rows"], 6);
        assert_eq!(json["generated_at"], "2025-03-10T00:00:00");
        Ok(())
    }
}
