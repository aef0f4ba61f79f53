// foodshare-core/src/application/fixtures.rs
//
// Shared test data: four providers, four receivers, five listings and six claims
// across Metro, Bayview and Hillside. "Today" for these fixtures is 2025-03-10.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::application::ingestion::{IngestionPipeline, IngestionReport};
use crate::domain::clock::FixedClock;
use crate::domain::project::SourceFiles;
use crate::domain::schema::TableName;
use crate::infrastructure::adapters::DuckDBConnector;

pub const PROVIDERS: &str = "\
provider_id,name,type,address,city,contact
1,Green Deli,Restaurant,12 Main St,Metro,555-0101
2,FreshMart,Supermarket,40 Market Rd,Metro,555-0102
3,Harbor Catering,Catering Service,7 Dock Ln,Bayview,
4,Idle Grocer,Grocery Store,1 Quiet St,Hillside,555-0104
";

pub const RECEIVERS: &str = "\
receiver_id,name,type,city,contact
1,Hope Shelter,Shelter,Metro,555-0201
2,City Food Bank,NGO,Metro,555-0202
3,Bay Charity,Charity,Bayview,555-0203
4,Sam Lee,Individual,Hillside,
";

pub const FOOD_LISTINGS: &str = "\
food_id,food_name,quantity,expiry_date,provider_id,provider_type,location,food_type,meal_type
10,Bread,5,2025-03-17,1,Restaurant,Metro,Vegan,Lunch
11,Rice Bowls,20,2025-03-12,1,Restaurant,Metro,Vegetarian,Dinner
12,Chicken Curry,10,2025-03-08,2,Supermarket,Metro,Non-Vegetarian,Dinner
13,Fruit Salad,8,2025-03-25,3,Catering Service,Bayview,Vegan,Breakfast
14,Sandwiches,12,2025-03-10,3,Catering Service,Bayview,Vegetarian,Snacks
";

pub const CLAIMS: &str = "\
claim_id,food_id,receiver_id,status,timestamp
100,10,1,Completed,2025-03-05 05:26:00
101,10,2,Completed,2025-03-06 10:00:00
102,11,1,Pending,2025-03-07 12:30:00
103,12,3,Cancelled,2025-03-08 08:15:00
104,13,3,Completed,2025-03-09 18:45:00
105,11,2,Completed,2025-03-09 20:00:00
";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap_or_default()
}

pub fn clock() -> FixedClock {
    FixedClock::on(today())
}

pub fn write_sources(dir: &Path, sources: &[(TableName, &str)]) -> Result<()> {
    fs::create_dir_all(dir)?;
    for (table, content) in sources {
        fs::write(dir.join(table.default_source_file()), content)?;
    }
    Ok(())
}

pub fn write_standard_sources(dir: &Path) -> Result<()> {
    write_sources(
        dir,
        &[
            (TableName::Providers, PROVIDERS),
            (TableName::Receivers, RECEIVERS),
            (TableName::FoodListings, FOOD_LISTINGS),
            (TableName::Claims, CLAIMS),
        ],
    )
}

pub async fn ingest(connector: &DuckDBConnector, data_dir: &Path) -> Result<IngestionReport> {
    let pipeline = IngestionPipeline::new(connector, data_dir, SourceFiles::default());
    Ok(pipeline.run(&clock()).await?)
}

/// In-memory store holding the standard data set.
pub async fn loaded_store() -> Result<DuckDBConnector> {
    let dir = tempfile::tempdir()?;
    write_standard_sources(dir.path())?;
    let connector = DuckDBConnector::in_memory()?;
    let report = ingest(&connector, dir.path()).await?;
    anyhow::ensure!(report.loaded_count() == 4, "fixture load failed: {}", report.summary());
    Ok(connector)
}
