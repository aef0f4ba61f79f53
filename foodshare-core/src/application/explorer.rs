// foodshare-core/src/application/explorer.rs
//
// Browsing views over the loaded store. Every filter value is bound; column
// expressions are fixed here.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use tracing::instrument;

use crate::application::engine::fetch;
use crate::application::schema::{SchemaManager, TableCount};
use crate::domain::clock::Clock;
use crate::domain::entity::{ClaimStatus, FoodType};
use crate::domain::filter::SqlFilter;
use crate::domain::report::{Cell, ResultSet};
use crate::error::FoodshareError;
use crate::ports::connector::Connector;

const PROVIDER_DIRECTORY: &str = r#"
WITH listing_stats AS (
    SELECT provider_id, COUNT(*) AS items, SUM(quantity) AS quantity
    FROM food_listings
    GROUP BY provider_id
),
claim_stats AS (
    SELECT
        f.provider_id,
        COUNT(c.claim_id) AS claims,
        COUNT(*) FILTER (WHERE c.status = 'Completed') AS successful
    FROM claims c
    JOIN food_listings f ON c.food_id = f.food_id
    GROUP BY f.provider_id
)
SELECT
    p.provider_id,
    p.name,
    p.type,
    p.city,
    p.contact,
    COALESCE(ls.items, 0) AS total_items,
    CAST(COALESCE(ls.quantity, 0) AS BIGINT) AS total_quantity,
    COALESCE(cs.claims, 0) AS total_claims,
    COALESCE(cs.successful, 0) AS successful_claims,
    ROUND(CAST(cs.successful AS DOUBLE) * 100 / NULLIF(cs.claims, 0), 1) AS success_rate
FROM providers p
LEFT JOIN listing_stats ls ON p.provider_id = ls.provider_id
LEFT JOIN claim_stats cs ON p.provider_id = cs.provider_id"#;

const LISTING_BROWSER: &str = r#"
WITH clock AS (
    SELECT CAST(? AS DATE) AS today, CAST(? AS INTEGER) AS soon_days
),
claim_stats AS (
    SELECT
        food_id,
        COUNT(*) AS claims,
        COUNT(*) FILTER (WHERE status = 'Completed') AS completed
    FROM claims
    GROUP BY food_id
)
SELECT
    f.food_id,
    f.food_name,
    f.quantity,
    f.expiry_date,
    f.location,
    f.food_type,
    f.meal_type,
    p.name AS provider_name,
    p.contact AS provider_contact,
    COALESCE(cs.claims, 0) AS total_claims,
    COALESCE(cs.completed, 0) AS completed_claims,
    CASE
        WHEN f.expiry_date <= clock.today THEN 'Expired'
        WHEN f.expiry_date <= clock.today + clock.soon_days THEN 'Expiring Soon'
        ELSE 'Fresh'
    END AS expiry_status
FROM food_listings f
CROSS JOIN clock
LEFT JOIN providers p ON f.provider_id = p.provider_id
LEFT JOIN claim_stats cs ON f.food_id = cs.food_id"#;

const RECENT_ACTIVITY: &str = r#"
SELECT
    c.claim_id,
    c.status,
    c."timestamp",
    f.food_name,
    r.name AS receiver_name
FROM claims c
LEFT JOIN food_listings f ON c.food_id = f.food_id
LEFT JOIN receivers r ON c.receiver_id = r.receiver_id
ORDER BY c."timestamp" DESC, c.claim_id DESC"#;

const ORPHANED_LISTINGS: &str = "SELECT COUNT(*) FROM food_listings f \
     LEFT JOIN providers p ON f.provider_id = p.provider_id \
     WHERE p.provider_id IS NULL";

const CLAIMS_LAST_DAY: &str = r#"SELECT COUNT(*) FROM claims
WHERE "timestamp" > CAST(? AS TIMESTAMP) - INTERVAL 24 HOUR
  AND "timestamp" <= CAST(? AS TIMESTAMP)"#;

const PROVIDER_TYPE_COUNTS: &str =
    "SELECT type, COUNT(*) AS n FROM providers GROUP BY type ORDER BY n DESC, type";
const FOOD_TYPE_COUNTS: &str = "SELECT food_type, COUNT(*) FROM food_listings GROUP BY food_type";
const CLAIM_STATUS_COUNTS: &str = "SELECT status, COUNT(*) FROM claims GROUP BY status";

/// Distinct values offered by the browsing filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub provider_types: Vec<String>,
    pub locations: Vec<String>,
    pub food_types: Vec<String>,
    pub meal_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub engine: String,
    pub as_of: NaiveDateTime,
    pub tables: Vec<TableCount>,
    /// `None` until the schema exists.
    pub orphaned_listings: Option<i64>,
    pub claims_last_24h: Option<i64>,
}

impl HealthReport {
    pub fn is_ready(&self) -> bool {
        self.tables.iter().all(|t| t.rows.is_some())
    }
}

/// Headcounts for the admin view, largest first. Every food type and claim
/// status is listed, with 0 when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub provider_types: Vec<(String, i64)>,
    pub food_types: Vec<(FoodType, i64)>,
    pub claim_statuses: Vec<(ClaimStatus, i64)>,
}

pub struct Explorer<'a> {
    connector: &'a dyn Connector,
    clock: &'a dyn Clock,
}

impl<'a> Explorer<'a> {
    pub fn new(connector: &'a dyn Connector, clock: &'a dyn Clock) -> Self {
        Self { connector, clock }
    }

    #[instrument(skip(self))]
    pub async fn provider_directory(
        &self,
        city: Option<&str>,
        provider_type: Option<&str>,
    ) -> Result<ResultSet, FoodshareError> {
        let filter = SqlFilter::new()
            .eq("p.city", city)
            .eq("p.type", provider_type);
        let sql = format!(
            "{}{}\nORDER BY total_quantity DESC, p.provider_id",
            PROVIDER_DIRECTORY,
            filter.where_clause()
        );
        fetch(self.connector, &sql, filter.params()).await
    }

    /// Listings by expiry, soonest first, with an Expired / Expiring Soon / Fresh label.
    #[instrument(skip(self))]
    pub async fn listing_browser(
        &self,
        location: Option<&str>,
        food_type: Option<&str>,
        meal_type: Option<&str>,
        expiring_soon_days: u32,
    ) -> Result<ResultSet, FoodshareError> {
        let filter = SqlFilter::new()
            .eq("f.location", location)
            .eq("f.food_type", food_type)
            .eq("f.meal_type", meal_type);
        let sql = format!(
            "{}{}\nORDER BY f.expiry_date, f.food_id",
            LISTING_BROWSER,
            filter.where_clause()
        );

        let mut params = vec![
            Cell::Date(self.clock.today()),
            Cell::Int(i64::from(expiring_soon_days)),
        ];
        params.extend(filter.into_params());
        fetch(self.connector, &sql, &params).await
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, FoodshareError> {
        Ok(FilterOptions {
            cities: self.distinct("providers", "city").await?,
            provider_types: self.distinct("providers", "type").await?,
            locations: self.distinct("food_listings", "location").await?,
            food_types: self.distinct("food_listings", "food_type").await?,
            meal_types: self.distinct("food_listings", "meal_type").await?,
        })
    }

    async fn distinct(&self, table: &'static str, column: &'static str) -> Result<Vec<String>, FoodshareError> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM {table} WHERE {column} IS NOT NULL ORDER BY 1"
        );
        let rs = fetch(self.connector, &sql, &[]).await?;
        Ok(rs
            .rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|cell| match cell {
                Cell::Text(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    /// Latest claims first.
    pub async fn recent_activity(&self, limit: usize) -> Result<ResultSet, FoodshareError> {
        let sql = format!("{}\nLIMIT {}", RECENT_ACTIVITY, limit);
        fetch(self.connector, &sql, &[]).await
    }

    #[instrument(skip(self))]
    pub async fn insights(&self) -> Result<Insights, FoodshareError> {
        let provider_types = self.label_counts(PROVIDER_TYPE_COUNTS).await?.into_iter().collect();
        let food_types = self.label_counts(FOOD_TYPE_COUNTS).await?.into_iter().collect();
        let statuses = self.label_counts(CLAIM_STATUS_COUNTS).await?.into_iter().collect();

        Ok(Insights {
            provider_types,
            food_types: ranked(&FoodType::ALL, &food_types, FoodType::as_str),
            claim_statuses: ranked(&ClaimStatus::ALL, &statuses, ClaimStatus::as_str),
        })
    }

    async fn label_counts(&self, sql: &str) -> Result<Vec<(String, i64)>, FoodshareError> {
        let rs = fetch(self.connector, sql, &[]).await?;
        Ok(rs
            .rows
            .iter()
            .filter_map(|row| match (row.first(), row.get(1).and_then(Cell::as_i64)) {
                (Some(Cell::Text(label)), Some(n)) => Some((label.clone(), n)),
                _ => None,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, FoodshareError> {
        let tables = SchemaManager::new(self.connector).row_counts().await?;
        let ready = tables.iter().all(|t| t.rows.is_some());
        let now = self.clock.now();

        let (orphaned_listings, claims_last_24h) = if ready {
            let orphans = self.connector.query_scalar(ORPHANED_LISTINGS).await?;
            let recent = fetch(
                self.connector,
                CLAIMS_LAST_DAY,
                &[Cell::Timestamp(now), Cell::Timestamp(now)],
            )
            .await?
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(Cell::as_i64)
            .unwrap_or(0);
            (Some(orphans), Some(recent))
        } else {
            (None, None)
        };

        Ok(HealthReport {
            engine: self.connector.engine_name().to_string(),
            as_of: now,
            tables,
            orphaned_listings,
            claims_last_24h,
        })
    }
}

// Stable sort keeps the enum order among equal counts
fn ranked<T: Copy>(all: &[T], counts: &HashMap<String, i64>, label: fn(&T) -> &'static str) -> Vec<(T, i64)> {
    let mut out: Vec<(T, i64)> = all
        .iter()
        .map(|v| (*v, counts.get(label(v)).copied().unwrap_or(0)))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}
