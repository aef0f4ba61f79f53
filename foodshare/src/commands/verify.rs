// foodshare/src/commands/verify.rs
//
// USE CASE: Re-run the integrity checks against the current store.

use anyhow::{Result, bail};
use std::path::Path;

use foodshare_core::application::{SchemaManager, verify_integrity};

use super::context::Workspace;
use super::table::new_table;

pub async fn execute(project_dir: &Path) -> Result<()> {
    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    SchemaManager::new(&connector).ensure_ready().await?;

    let report = verify_integrity(&connector).await;

    let mut table = new_table(["Check", "Kind", "Violations", "Sample ids"]);
    for finding in &report.findings {
        let sample = finding
            .sample_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            finding.check.clone(),
            format!("{:?}", finding.kind),
            finding.violations.to_string(),
            sample,
        ]);
    }
    println!("{table}");

    for skipped in &report.skipped {
        println!("⚠️  Skipped: {}", skipped);
    }

    if !report.is_clean() {
        bail!(
            "{} integrity violation(s) found",
            report.total_violations()
        );
    }
    println!("✅ Integrity verified ({} checks)", report.findings.len());
    Ok(())
}
