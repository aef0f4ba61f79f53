// foodshare/src/commands/providers.rs
//
// USE CASE: Browse the provider directory.

use anyhow::Result;
use std::path::Path;

use foodshare_core::application::{Explorer, SchemaManager};
use foodshare_core::domain::clock::SystemClock;

use super::context::Workspace;
use super::table::render;

pub async fn execute(
    project_dir: &Path,
    city: Option<String>,
    provider_type: Option<String>,
) -> Result<()> {
    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    SchemaManager::new(&connector).ensure_ready().await?;

    let explorer = Explorer::new(&connector, &SystemClock);
    let providers = explorer
        .provider_directory(city.as_deref(), provider_type.as_deref())
        .await?;

    if providers.is_empty() {
        let options = explorer.filter_options().await?;
        println!("No provider matches these filters.");
        println!("   Cities: {}", options.cities.join(", "));
        println!("   Types: {}", options.provider_types.join(", "));
        return Ok(());
    }

    println!("{}", render(&providers));
    println!("   {} provider(s)", providers.len());
    Ok(())
}
