// foodshare/src/commands/init.rs
//
// USE CASE: Create (or reset) the schema.

use anyhow::Result;
use std::path::Path;

use foodshare_core::application::SchemaManager;
use foodshare_core::infrastructure::config::scaffold_config;

use super::context::Workspace;
use super::table::new_table;

pub async fn execute(project_dir: &Path, reset: bool) -> Result<()> {
    let name = project_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "foodshare".to_string());

    let config_path = scaffold_config(project_dir, &name)?;
    println!("⚙️  Project file: {}", config_path.display());

    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    let schema = SchemaManager::new(&connector);

    if reset {
        schema.drop_all().await?;
        println!("🗑️  Existing tables dropped");
    }
    schema.create_all().await?;

    let mut table = new_table(["Table", "Columns"]);
    for description in schema.describe().await? {
        let columns = description
            .columns
            .map(|cols| {
                cols.iter()
                    .map(|c| format!("{} {}", c.name, c.data_type))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![description.table.to_string(), columns]);
    }
    println!("{table}");
    println!("✨ Schema ready in {}", ws.database_path().display());
    Ok(())
}
