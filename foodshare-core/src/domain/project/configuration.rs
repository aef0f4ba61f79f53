// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::schema::TableName;

/// File names of the four CSV sources, relative to `data-path`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceFiles {
    pub providers: String,
    pub receivers: String,
    #[serde(rename = "food-listings")]
    pub food_listings: String,
    pub claims: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            providers: TableName::Providers.default_source_file().to_string(),
            receivers: TableName::Receivers.default_source_file().to_string(),
            food_listings: TableName::FoodListings.default_source_file().to_string(),
            claims: TableName::Claims.default_source_file().to_string(),
        }
    }
}

impl SourceFiles {
    pub fn for_table(&self, table: TableName) -> &str {
        match table {
            TableName::Providers => &self.providers,
            TableName::Receivers => &self.receivers,
            TableName::FoodListings => &self.food_listings,
            TableName::Claims => &self.claims,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "database-path", default = "default_database_path")]
    #[validate(length(min = 1, message = "database-path cannot be empty"))]
    pub database_path: String,

    #[serde(rename = "data-path", default = "default_data_path")]
    #[validate(length(min = 1, message = "data-path cannot be empty"))]
    pub data_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    #[validate(length(min = 1, message = "target-path cannot be empty"))]
    pub target_path: String,

    #[serde(default)]
    pub sources: SourceFiles,

    /// Listings expiring within this many days are flagged "Expiring Soon".
    #[serde(rename = "expiring-soon-days", default = "default_expiring_soon_days")]
    #[validate(range(min = 1, max = 365))]
    pub expiring_soon_days: u32,
}

impl ProjectConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: default_version(),
            database_path: default_database_path(),
            data_path: default_data_path(),
            target_path: default_target_path(),
            sources: SourceFiles::default(),
            expiring_soon_days: default_expiring_soon_days(),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_database_path() -> String {
    "database/food_wastage.duckdb".to_string()
}
fn default_data_path() -> String {
    "data".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_expiring_soon_days() -> u32 {
    7
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("name: demo\n").unwrap();
        assert_eq!(config.data_path, "data");
        assert_eq!(config.expiring_soon_days, 7);
        assert_eq!(config.sources.for_table(TableName::Claims), "claims_data.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_window_is_rejected() {
        let yaml = "name: demo\nexpiring-soon-days: 0\nsources:\n  claims: c.csv\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sources.claims, "c.csv");
        assert_eq!(config.sources.providers, "providers_data.csv");
        assert!(config.validate().is_err());
    }
}
