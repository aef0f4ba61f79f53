// foodshare-core/src/domain/catalog/mod.rs

use serde::Serialize;
use std::fmt;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFamily {
    EntityDistribution,
    Availability,
    ClaimOutcome,
    Efficiency,
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueryFamily::EntityDistribution => "Entity distribution",
            QueryFamily::Availability => "Availability",
            QueryFamily::ClaimOutcome => "Claim outcome",
            QueryFamily::Efficiency => "Efficiency",
        };
        f.write_str(label)
    }
}

/// A read-only analytical report. `uses_clock` queries take the current date
/// as their single bound parameter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogQuery {
    pub number: u8,
    pub slug: &'static str,
    pub title: &'static str,
    pub family: QueryFamily,
    #[serde(skip)]
    pub sql: &'static str,
    pub uses_clock: bool,
}

impl CatalogQuery {
    /// "Query 7: Common Food Types"
    pub fn label(&self) -> String {
        format!("Query {}: {}", self.number, self.title)
    }
}

macro_rules! catalog_query {
    ($number:expr, $slug:expr, $title:expr, $family:ident, $file:expr, $clock:expr) => {
        CatalogQuery {
            number: $number,
            slug: $slug,
            title: $title,
            family: QueryFamily::$family,
            sql: include_str!(concat!("sql/", $file)),
            uses_clock: $clock,
        }
    };
}

pub static CATALOG: [CatalogQuery; 15] = [
    catalog_query!(1, "providers-receivers-by-city", "Providers & Receivers by City", EntityDistribution, "01_providers_receivers_by_city.sql", false),
    catalog_query!(2, "top-provider-types", "Top Provider Types", EntityDistribution, "02_top_provider_types.sql", false),
    catalog_query!(3, "provider-contacts-by-city", "Provider Contacts by City", EntityDistribution, "03_provider_contacts_by_city.sql", false),
    catalog_query!(4, "top-food-claimers", "Top Food Claimers", ClaimOutcome, "04_top_food_claimers.sql", false),
    catalog_query!(5, "total-food-available", "Total Food Available", Availability, "05_total_food_available.sql", true),
    catalog_query!(6, "food-listings-by-city", "Food Listings by City", Availability, "06_food_listings_by_city.sql", false),
    catalog_query!(7, "common-food-types", "Common Food Types", Availability, "07_common_food_types.sql", false),
    catalog_query!(8, "claims-per-food-item", "Claims per Food Item", ClaimOutcome, "08_claims_per_food_item.sql", false),
    catalog_query!(9, "successful-providers", "Successful Providers", ClaimOutcome, "09_successful_providers.sql", false),
    catalog_query!(10, "claim-status-distribution", "Claim Status Distribution", ClaimOutcome, "10_claim_status_distribution.sql", false),
    catalog_query!(11, "avg-food-per-receiver", "Average Food per Receiver", ClaimOutcome, "11_avg_food_per_receiver.sql", false),
    catalog_query!(12, "meal-type-popularity", "Meal Type Popularity", ClaimOutcome, "12_meal_type_popularity.sql", false),
    catalog_query!(13, "provider-food-donations", "Provider Food Donations", Efficiency, "13_provider_food_donations.sql", false),
    catalog_query!(14, "geographic-distribution", "Geographic Distribution", Efficiency, "14_geographic_distribution.sql", false),
    catalog_query!(15, "system-metrics", "System Metrics", Efficiency, "15_system_metrics.sql", false),
];

/// Lookup by number ("7", "q7") or slug ("common-food-types").
pub fn find(key: &str) -> Result<&'static CatalogQuery, DomainError> {
    let key = key.trim();
    let numeric = key.strip_prefix(['q', 'Q']).unwrap_or(key);

    let found = match numeric.parse::<u8>() {
        Ok(n) => CATALOG.iter().find(|q| q.number == n),
        Err(_) => {
            let slug = key.to_ascii_lowercase().replace('_', "-");
            CATALOG.iter().find(|q| q.slug == slug)
        }
    };

    found.ok_or_else(|| DomainError::UnknownQuery(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_numbered_in_order() {
        for (idx, query) in CATALOG.iter().enumerate() {
            assert_eq!(query.number as usize, idx + 1);
            assert!(!query.sql.trim().is_empty(), "{} has no SQL", query.slug);
        }
    }

    #[test]
    fn test_only_clock_queries_bind_parameters() {
        for query in &CATALOG {
            assert_eq!(query.sql.contains('?'), query.uses_clock, "{}", query.slug);
        }
    }

    #[test]
    fn test_lookup_by_number_and_slug() {
        assert_eq!(find("7").unwrap().slug, "common-food-types");
        assert_eq!(find("q10").unwrap().number, 10);
        assert_eq!(find("system_metrics").unwrap().number, 15);
        assert!(matches!(find("16"), Err(DomainError::UnknownQuery(_))));
        assert!(find("no-such-report").is_err());
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<&str> = CATALOG.iter().map(|q| q.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), CATALOG.len());
    }
}
