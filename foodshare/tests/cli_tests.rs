use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const PROVIDERS: &str = "\
provider_id,name,type,address,city,contact
1,Green Deli,Restaurant,12 Main St,Metro,555-0101
2,FreshMart,Supermarket,40 Market Rd,Metro,555-0102
3,Harbor Catering,Catering Service,7 Dock Ln,Bayview,
4,Idle Grocer,Grocery Store,1 Quiet St,Hillside,555-0104
";

const RECEIVERS: &str = "\
receiver_id,name,type,city,contact
1,Hope Shelter,Shelter,Metro,555-0201
2,City Food Bank,NGO,Metro,555-0202
3,Bay Charity,Charity,Bayview,555-0203
4,Sam Lee,Individual,Hillside,
";

const FOOD_LISTINGS: &str = "\
food_id,food_name,quantity,expiry_date,provider_id,provider_type,location,food_type,meal_type
10,Bread,5,2025-03-17,1,Restaurant,Metro,Vegan,Lunch
11,Rice Bowls,20,2025-03-12,1,Restaurant,Metro,Vegetarian,Dinner
12,Chicken Curry,10,2025-03-08,2,Supermarket,Metro,Non-Vegetarian,Dinner
13,Fruit Salad,8,2025-03-25,3,Catering Service,Bayview,Vegan,Breakfast
14,Sandwiches,12,2025-03-10,3,Catering Service,Bayview,Vegetarian,Snacks
";

const CLAIMS: &str = "\
claim_id,food_id,receiver_id,status,timestamp
100,10,1,Completed,2025-03-05 05:26:00
101,10,2,Completed,2025-03-06 10:00:00
102,11,1,Pending,2025-03-07 12:30:00
103,12,3,Cancelled,2025-03-08 08:15:00
104,13,3,Completed,2025-03-09 18:45:00
105,11,2,Completed,2025-03-09 20:00:00
";

/// Temporary project directory with a foodshare.yaml and a data/ folder.
struct FoodshareTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl FoodshareTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("metro_food");
        fs::create_dir_all(root.join("data"))?;
        fs::write(
            root.join("foodshare.yaml"),
            "name: metro_food\nversion: \"1.0\"\nexpiring-soon-days: 7\n",
        )?;
        Ok(Self { _tmp: tmp, root })
    }

    fn with_standard_sources() -> Result<Self> {
        let env = Self::new()?;
        env.source("providers_data.csv", PROVIDERS)?;
        env.source("receivers_data.csv", RECEIVERS)?;
        env.source("food_listings_data.csv", FOOD_LISTINGS)?;
        env.source("claims_data.csv", CLAIMS)?;
        Ok(env)
    }

    fn source(&self, file_name: &str, content: &str) -> Result<()> {
        fs::write(self.root.join("data").join(file_name), content)?;
        Ok(())
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn foodshare(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("foodshare"));
        cmd.current_dir(&self.root)
            .env_remove("FOODSHARE_DATABASE_PATH")
            .env_remove("FOODSHARE_DATA_PATH")
            .env_remove("FOODSHARE_TARGET_PATH")
            .env_remove("RUST_LOG");
        cmd
    }

    fn loaded(self) -> Result<Self> {
        self.foodshare().arg("init").assert().success();
        self.foodshare().arg("load").assert().success();
        Ok(self)
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).with_context(|| format!("{} not written", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

#[test]
fn test_catalog_lists_fifteen_reports() -> Result<()> {
    let env = FoodshareTestEnv::new()?;
    env.foodshare()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("common-food-types"))
        .stdout(predicate::str::contains("system-metrics"))
        .stdout(predicate::str::contains("Claim Status Distribution"));
    Ok(())
}

#[test]
fn test_init_creates_database_and_project_file() -> Result<()> {
    let env = FoodshareTestEnv::new()?;
    fs::remove_file(env.path("foodshare.yaml"))?;

    env.foodshare()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema ready"))
        .stdout(predicate::str::contains("food_listings"));

    assert!(env.path("foodshare.yaml").is_file());
    assert!(env.path("database/food_wastage.duckdb").is_file());

    // Running it again is harmless
    env.foodshare().args(["init", "--reset"]).assert().success();
    Ok(())
}

#[test]
fn test_load_then_query() -> Result<()> {
    let env = FoodshareTestEnv::with_standard_sources()?;
    env.foodshare().arg("init").assert().success();

    env.foodshare()
        .arg("load")
        .assert()
        .success()
        .stdout(predicate::str::contains("4/4 tables loaded"));

    let results = read_json(&env.path("target/load_results.json"))?;
    assert_eq!(results["tables"][3]["table"], "claims");
    assert_eq!(results["tables"][3]["rows"], 6);

    env.foodshare()
        .args(["query", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Query 7: Common Food Types"))
        .stdout(predicate::str::contains("Non-Vegetarian"));

    env.foodshare()
        .args(["query", "q10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL"))
        .stdout(predicate::str::contains("66.67"));
    Ok(())
}

#[test]
fn test_query_all_with_export() -> Result<()> {
    let env = FoodshareTestEnv::with_standard_sources()?.loaded()?;

    env.foodshare()
        .args(["query", "--all", "--as-of", "2025-03-10", "--export", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15/15 succeeded"));

    let exported = fs::read_dir(env.path("target/reports"))?.count();
    assert_eq!(exported, 15);

    let q5 = read_json(&env.path("target/reports/q05_total-food-available.json"))?;
    assert_eq!(q5["as_of"], "2025-03-10");
    assert_eq!(q5["records"][0]["items_expired"], 2);
    assert_eq!(q5["records"][0]["total_quantity_available"], 55);

    env.foodshare()
        .args(["query", "meal-type-popularity", "--export", "csv"])
        .assert()
        .success();
    let csv = fs::read_to_string(env.path("target/reports/q12_meal-type-popularity.csv"))?;
    assert!(csv.starts_with("meal_type,"));
    Ok(())
}

#[test]
fn test_load_with_unknown_receiver_fails_claims() -> Result<()> {
    let env = FoodshareTestEnv::new()?;
    env.source("providers_data.csv", PROVIDERS)?;
    env.source("receivers_data.csv", "receiver_id,name,type,city,contact\n")?;
    env.source("food_listings_data.csv", FOOD_LISTINGS)?;
    env.source(
        "claims_data.csv",
        "claim_id,food_id,receiver_id,status,timestamp\n100,10,42,Pending,2025-03-05 05:26:00\n",
    )?;

    env.foodshare()
        .arg("load")
        .assert()
        .failure()
        .stdout(predicate::str::contains("claims_data.csv"))
        .stderr(predicate::str::contains("3/4 tables loaded"));

    let results = read_json(&env.path("target/load_results.json"))?;
    assert_eq!(results["tables"][3]["status"], "failed");
    assert_eq!(results["tables"][3]["kind"], "integrity");
    Ok(())
}

#[test]
fn test_missing_source_is_named() -> Result<()> {
    let env = FoodshareTestEnv::new()?;
    env.source("providers_data.csv", PROVIDERS)?;
    env.source("receivers_data.csv", RECEIVERS)?;
    env.source("food_listings_data.csv", FOOD_LISTINGS)?;

    env.foodshare()
        .arg("load")
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing source"))
        .stdout(predicate::str::contains("Add 'claims_data.csv'"));
    Ok(())
}

#[test]
fn test_verify_after_load() -> Result<()> {
    let env = FoodshareTestEnv::with_standard_sources()?.loaded()?;
    env.foodshare()
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("Integrity verified (7 checks)"));
    Ok(())
}

#[test]
fn test_browsing_commands() -> Result<()> {
    let env = FoodshareTestEnv::with_standard_sources()?.loaded()?;

    env.foodshare()
        .args(["providers", "--city", "Metro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Green Deli"))
        .stdout(predicate::str::contains("Harbor Catering").not());

    env.foodshare()
        .args(["listings", "--location", "Metro", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expiring Soon"))
        .stdout(predicate::str::contains("Expired"))
        .stdout(predicate::str::contains("Fruit Salad").not());

    env.foodshare()
        .args(["status", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Orphaned listings: 0"))
        .stdout(predicate::str::contains("Claims in the last 24h"))
        .stdout(predicate::str::contains("Food types: Vegetarian 2, Vegan 2, Non-Vegetarian 1"))
        .stdout(predicate::str::contains("Claim statuses: Completed 4, Pending 1, Cancelled 1"))
        .stdout(predicate::str::contains("City Food Bank"));
    Ok(())
}

#[test]
fn test_query_errors_exit_non_zero() -> Result<()> {
    let env = FoodshareTestEnv::new()?;

    // No tables yet
    env.foodshare()
        .args(["query", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing tables"));

    env.foodshare().arg("init").assert().success();
    env.foodshare()
        .args(["query", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown catalog query"));
    Ok(())
}

#[test]
fn test_missing_project_file() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    Command::new(assert_cmd::cargo::cargo_bin!("foodshare"))
        .current_dir(tmp.path())
        .arg("load")
        .assert()
        .failure()
        .stderr(predicate::str::contains("foodshare.yaml"));
    Ok(())
}
