// foodshare-core/src/domain/schema.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four managed tables. Declaration order is the dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Providers,
    Receivers,
    FoodListings,
    Claims,
}

impl TableName {
    /// Parents before children (insert / create order).
    pub const LOAD_ORDER: [TableName; 4] = [
        TableName::Providers,
        TableName::Receivers,
        TableName::FoodListings,
        TableName::Claims,
    ];

    /// Children before parents (delete / drop order).
    pub const DROP_ORDER: [TableName; 4] = [
        TableName::Claims,
        TableName::FoodListings,
        TableName::Receivers,
        TableName::Providers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableName::Providers => "providers",
            TableName::Receivers => "receivers",
            TableName::FoodListings => "food_listings",
            TableName::Claims => "claims",
        }
    }

    pub fn primary_key(&self) -> &'static str {
        match self {
            TableName::Providers => "provider_id",
            TableName::Receivers => "receiver_id",
            TableName::FoodListings => "food_id",
            TableName::Claims => "claim_id",
        }
    }

    pub fn default_source_file(&self) -> &'static str {
        match self {
            TableName::Providers => "providers_data.csv",
            TableName::Receivers => "receivers_data.csv",
            TableName::FoodListings => "food_listings_data.csv",
            TableName::Claims => "claims_data.csv",
        }
    }

    /// Columns written by ingestion. Audit columns are left to their defaults.
    pub fn insert_columns(&self) -> &'static [&'static str] {
        match self {
            TableName::Providers => &["provider_id", "name", "type", "address", "city", "contact"],
            TableName::Receivers => &["receiver_id", "name", "type", "city", "contact"],
            TableName::FoodListings => &[
                "food_id",
                "food_name",
                "quantity",
                "expiry_date",
                "provider_id",
                "provider_type",
                "location",
                "food_type",
                "meal_type",
                "is_available",
            ],
            TableName::Claims => &["claim_id", "food_id", "receiver_id", "status", "timestamp"],
        }
    }

    /// Parameterized INSERT matching `insert_columns`. Dates and timestamps are
    /// bound as text and cast by the engine.
    pub fn insert_sql(&self) -> String {
        let columns = self.insert_columns();
        let quoted: Vec<String> = columns.iter().map(|c| format!("\"{}\"", c)).collect();
        let placeholders: Vec<&str> = columns
            .iter()
            .map(|c| match *c {
                "expiry_date" => "CAST(? AS DATE)",
                "timestamp" => "CAST(? AS TIMESTAMP)",
                _ => "?",
            })
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name(),
            quoted.join(", "),
            placeholders.join(", ")
        )
    }

    pub fn create_sql(&self) -> &'static str {
        match self {
            TableName::Providers => CREATE_PROVIDERS,
            TableName::Receivers => CREATE_RECEIVERS,
            TableName::FoodListings => CREATE_FOOD_LISTINGS,
            TableName::Claims => CREATE_CLAIMS,
        }
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name())
    }

    pub fn clear_sql(&self) -> String {
        format!("DELETE FROM {}", self.name())
    }

    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.name())
    }

    /// Tables holding a foreign key to this one.
    pub fn dependents(&self) -> &'static [TableName] {
        match self {
            TableName::Providers => &[TableName::FoodListings],
            TableName::Receivers => &[TableName::Claims],
            TableName::FoodListings => &[TableName::Claims],
            TableName::Claims => &[],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- DDL ---

const CREATE_PROVIDERS: &str = r#"
CREATE TABLE IF NOT EXISTS providers (
    provider_id INTEGER PRIMARY KEY,
    name VARCHAR NOT NULL,
    type VARCHAR NOT NULL,
    address VARCHAR NOT NULL,
    city VARCHAR NOT NULL,
    contact VARCHAR NOT NULL,
    created_at TIMESTAMP DEFAULT current_timestamp
)"#;

const CREATE_RECEIVERS: &str = r#"
CREATE TABLE IF NOT EXISTS receivers (
    receiver_id INTEGER PRIMARY KEY,
    name VARCHAR NOT NULL,
    type VARCHAR NOT NULL,
    city VARCHAR NOT NULL,
    contact VARCHAR NOT NULL,
    created_at TIMESTAMP DEFAULT current_timestamp
)"#;

const CREATE_FOOD_LISTINGS: &str = r#"
CREATE TABLE IF NOT EXISTS food_listings (
    food_id INTEGER PRIMARY KEY,
    food_name VARCHAR NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    expiry_date DATE NOT NULL,
    provider_id INTEGER NOT NULL,
    provider_type VARCHAR NOT NULL,
    location VARCHAR NOT NULL,
    food_type VARCHAR NOT NULL CHECK (food_type IN ('Vegetarian', 'Non-Vegetarian', 'Vegan')),
    meal_type VARCHAR NOT NULL CHECK (meal_type IN ('Breakfast', 'Lunch', 'Dinner', 'Snacks')),
    is_available BOOLEAN DEFAULT TRUE,
    created_at TIMESTAMP DEFAULT current_timestamp,
    FOREIGN KEY (provider_id) REFERENCES providers (provider_id)
)"#;

const CREATE_CLAIMS: &str = r#"
CREATE TABLE IF NOT EXISTS claims (
    claim_id INTEGER PRIMARY KEY,
    food_id INTEGER NOT NULL,
    receiver_id INTEGER NOT NULL,
    status VARCHAR NOT NULL CHECK (status IN ('Pending', 'Completed', 'Cancelled')),
    "timestamp" TIMESTAMP NOT NULL,
    created_at TIMESTAMP DEFAULT current_timestamp,
    updated_at TIMESTAMP DEFAULT current_timestamp,
    FOREIGN KEY (food_id) REFERENCES food_listings (food_id),
    FOREIGN KEY (receiver_id) REFERENCES receivers (receiver_id)
)"#;

/// Secondary indexes on the catalog's filter and grouping columns.
pub const INDEXES: [&str; 10] = [
    "CREATE INDEX IF NOT EXISTS idx_providers_city ON providers(city)",
    "CREATE INDEX IF NOT EXISTS idx_providers_type ON providers(type)",
    "CREATE INDEX IF NOT EXISTS idx_receivers_city ON receivers(city)",
    "CREATE INDEX IF NOT EXISTS idx_receivers_type ON receivers(type)",
    "CREATE INDEX IF NOT EXISTS idx_food_location ON food_listings(location)",
    "CREATE INDEX IF NOT EXISTS idx_food_type ON food_listings(food_type)",
    "CREATE INDEX IF NOT EXISTS idx_food_meal_type ON food_listings(meal_type)",
    "CREATE INDEX IF NOT EXISTS idx_food_expiry ON food_listings(expiry_date)",
    "CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status)",
    "CREATE INDEX IF NOT EXISTS idx_claims_timestamp ON claims(\"timestamp\")",
];
