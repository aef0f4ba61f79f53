// foodshare-core/src/application/export.rs

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::application::reporting::Report;
use crate::domain::report::Cell;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, write_json};

pub const REPORTS_DIR: &str = "reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Serialize)]
struct JsonExport<'r> {
    query: String,
    slug: &'static str,
    family: String,
    as_of: String,
    generated_at: String,
    row_count: usize,
    columns: &'r [String],
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// `q07_common-food-types.csv`
pub fn export_file_name(report: &Report, format: ExportFormat) -> String {
    format!(
        "q{:02}_{}.{}",
        report.query.number,
        report.query.slug,
        format.extension()
    )
}

/// Writes the report under `<target_dir>/reports/` and returns the file path.
pub fn export_report(
    report: &Report,
    target_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, InfrastructureError> {
    let path = target_dir
        .join(REPORTS_DIR)
        .join(export_file_name(report, format));

    match format {
        ExportFormat::Json => write_json(&path, &json_document(report))?,
        ExportFormat::Csv => atomic_write(&path, csv_document(report)?)?,
    }

    info!("💾 {} exported to {}", report.query.label(), path.display());
    Ok(path)
}

fn json_document(report: &Report) -> JsonExport<'_> {
    JsonExport {
        query: report.query.label(),
        slug: report.query.slug,
        family: report.query.family.to_string(),
        as_of: report.as_of.to_string(),
        generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        row_count: report.result.len(),
        columns: &report.result.columns,
        records: report.result.to_records(),
    }
}

fn csv_document(report: &Report) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&report.result.columns)?;
    for row in &report.result.rows {
        writer.write_record(row.iter().map(|cell| match cell {
            Cell::Null => String::new(),
            other => other.to_string(),
        }))?;
    }
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}
