// foodshare/src/commands/query.rs
//
// USE CASE: Run catalog reports.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::Path;

use foodshare_core::application::{ExportFormat, Report, ReportRunner, SchemaManager, export_report};

use super::context::{Workspace, clock_for};
use super::table::render;

pub async fn execute(
    project_dir: &Path,
    key: Option<String>,
    all: bool,
    as_of: Option<NaiveDate>,
    export: Option<ExportFormat>,
) -> Result<()> {
    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    SchemaManager::new(&connector).ensure_ready().await?;

    let clock = clock_for(as_of);
    let runner = ReportRunner::new(&connector, clock.as_ref());

    if all {
        let batch = runner.run_all().await;
        for report in &batch.reports {
            show(report);
            if let Some(format) = export {
                save(report, &ws, format)?;
            }
        }
        for failure in &batch.failures {
            eprintln!("❌ {}: {}", failure.query.label(), failure.reason);
        }
        if !batch.is_complete() {
            bail!("{}", batch.summary());
        }
        println!("\n✨ {}", batch.summary());
        return Ok(());
    }

    let key = key.context("Give a report number or slug, or use --all")?;
    let report = runner.run_key(&key).await?;
    show(&report);
    if let Some(format) = export {
        save(&report, &ws, format)?;
    }
    Ok(())
}

fn show(report: &Report) {
    println!("\n📊 {} ({})", report.query.label(), report.query.family);
    println!("{}", render(&report.result));
    println!(
        "   {} row(s) in {}ms, as of {}",
        report.result.len(),
        report.elapsed_ms,
        report.as_of
    );
}

fn save(report: &Report, ws: &Workspace, format: ExportFormat) -> Result<()> {
    let path = export_report(report, &ws.target_dir(), format)?;
    println!("💾 Exported to {}", path.display());
    Ok(())
}
