// foodshare-core/src/application/mod.rs

pub mod engine;
pub mod explorer;
pub mod export;
pub mod ingestion;
pub mod integrity;
pub mod reporting;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire `use foodshare_core::application::{IngestionPipeline, ReportRunner};`
// sans connaître la structure interne des fichiers.

pub use engine::execute_query;
pub use explorer::{Explorer, FilterOptions, HealthReport, Insights};
pub use export::{ExportFormat, export_report};
pub use ingestion::{FailureKind, IngestionPipeline, IngestionReport, LoadStatus, TableLoad};
pub use integrity::verify_integrity;
pub use reporting::{BatchReport, Report, ReportRunner};
pub use schema::SchemaManager;
