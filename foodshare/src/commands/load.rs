// foodshare/src/commands/load.rs
//
// USE CASE: Reload the four tables from their CSV sources.

use anyhow::{Result, bail};
use std::path::Path;
use std::time::Instant;

use foodshare_core::application::{IngestionPipeline, LoadStatus};
use foodshare_core::domain::clock::SystemClock;

use super::context::Workspace;
use super::table::new_table;

pub async fn execute(project_dir: &Path) -> Result<()> {
    let start = Instant::now();

    println!("⚙️  Loading configuration...");
    let ws = Workspace::load(project_dir)?;
    println!("   Project: {} (v{})", ws.config.name, ws.config.version);
    println!("   Sources: {}", ws.data_dir().display());

    let connector = ws.connect()?;
    let pipeline = IngestionPipeline::new(&connector, &ws.data_dir(), ws.config.sources.clone());
    let report = pipeline.run(&SystemClock).await?;
    let results_path = report.persist(&ws.target_dir())?;

    let mut table = new_table(["Table", "Source", "Valid", "Rejected", "Status"]);
    for load in &report.tables {
        let status = match &load.status {
            LoadStatus::Loaded { rows } => format!("✅ {} rows", rows),
            LoadStatus::MissingSource { .. } => "⚠️  missing source".to_string(),
            LoadStatus::Failed { kind, message } => format!("❌ {:?}: {}", kind, message),
        };
        table.add_row(vec![
            load.table.to_string(),
            load.source.clone(),
            load.valid_records.to_string(),
            load.rejected.len().to_string(),
            status,
        ]);
    }
    println!("{table}");

    let integrity = &report.integrity;
    if integrity.is_clean() {
        println!("🔎 Integrity: {} checks passed", integrity.findings.len());
    } else {
        println!("🔎 Integrity: {} violation(s)", integrity.total_violations());
    }

    for line in &report.guidance {
        println!("👉 {}", line);
    }
    println!("📝 Results written to {}", results_path.display());

    if report.loaded_count() < report.tables.len() {
        bail!("{}", report.summary());
    }
    println!("\n✨ {} in {:.2?}", report.summary(), start.elapsed());
    Ok(())
}
