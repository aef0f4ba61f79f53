// foodshare/src/commands/status.rs
//
// USE CASE: Store health at a glance.

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Display;
use std::path::Path;

use foodshare_core::application::Explorer;

use super::context::{Workspace, clock_for};
use super::table::{new_table, render};

const RECENT_CLAIMS: usize = 5;

pub async fn execute(project_dir: &Path, as_of: Option<NaiveDate>) -> Result<()> {
    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    let clock = clock_for(as_of);
    let explorer = Explorer::new(&connector, clock.as_ref());

    let health = explorer.health().await?;
    println!("🩺 {} store at {}", health.engine, ws.database_path().display());

    let mut table = new_table(["Table", "Rows"]);
    for count in &health.tables {
        let rows = count.rows.map_or("missing".to_string(), |n| n.to_string());
        table.add_row(vec![count.table.to_string(), rows]);
    }
    println!("{table}");

    if !health.is_ready() {
        println!("👉 Run `foodshare init` then `foodshare load`.");
        return Ok(());
    }

    if let Some(orphans) = health.orphaned_listings {
        println!("   Orphaned listings: {}", orphans);
    }
    if let Some(recent) = health.claims_last_24h {
        println!("   Claims in the last 24h (before {}): {}", health.as_of, recent);
    }

    let insights = explorer.insights().await?;
    println!("\n🔍 Quick insights");
    println!("   Provider types: {}", counts_line(&insights.provider_types));
    println!("   Food types: {}", counts_line(&insights.food_types));
    println!("   Claim statuses: {}", counts_line(&insights.claim_statuses));

    let activity = explorer.recent_activity(RECENT_CLAIMS).await?;
    if !activity.is_empty() {
        println!("\nRecent claims");
        println!("{}", render(&activity));
    }
    Ok(())
}

fn counts_line<T: Display>(counts: &[(T, i64)]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(label, n)| format!("{} {}", label, n))
        .collect::<Vec<_>>()
        .join(", ")
}
