// foodshare/src/commands/listings.rs
//
// USE CASE: Browse food listings by expiry.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

use foodshare_core::application::{Explorer, SchemaManager};

use super::context::{Workspace, clock_for};
use super::table::render;

pub async fn execute(
    project_dir: &Path,
    location: Option<String>,
    food_type: Option<String>,
    meal_type: Option<String>,
    as_of: Option<NaiveDate>,
) -> Result<()> {
    let ws = Workspace::load(project_dir)?;
    let connector = ws.connect()?;
    SchemaManager::new(&connector).ensure_ready().await?;

    let clock = clock_for(as_of);
    let explorer = Explorer::new(&connector, clock.as_ref());
    let listings = explorer
        .listing_browser(
            location.as_deref(),
            food_type.as_deref(),
            meal_type.as_deref(),
            ws.config.expiring_soon_days,
        )
        .await?;

    if listings.is_empty() {
        let options = explorer.filter_options().await?;
        println!("No listing matches these filters.");
        println!("   Locations: {}", options.locations.join(", "));
        println!("   Food types: {}", options.food_types.join(", "));
        println!("   Meal types: {}", options.meal_types.join(", "));
        return Ok(());
    }

    println!("{}", render(&listings));
    println!(
        "   {} listing(s), expiring soon = within {} days of {}",
        listings.len(),
        ws.config.expiring_soon_days,
        clock.today()
    );
    Ok(())
}
