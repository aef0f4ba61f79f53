// foodshare-core/src/application/reporting.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::application::engine::fetch;
use crate::domain::catalog::{self, CATALOG, CatalogQuery};
use crate::domain::clock::Clock;
use crate::domain::error::DomainError;
use crate::domain::report::{Cell, ResultSet};
use crate::error::FoodshareError;
use crate::ports::connector::Connector;

/// One executed catalog query.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub query: &'static CatalogQuery,
    pub as_of: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub elapsed_ms: u64,
    pub result: ResultSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedQuery {
    pub query: &'static CatalogQuery,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<Report>,
    pub failures: Vec<FailedQuery>,
}

impl BatchReport {
    /// "14/15 succeeded"
    pub fn summary(&self) -> String {
        format!(
            "{}/{} succeeded",
            self.reports.len(),
            self.reports.len() + self.failures.len()
        )
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn get(&self, number: u8) -> Option<&Report> {
        self.reports.iter().find(|r| r.query.number == number)
    }
}

pub struct ReportRunner<'a> {
    connector: &'a dyn Connector,
    clock: &'a dyn Clock,
}

impl<'a> ReportRunner<'a> {
    pub fn new(connector: &'a dyn Connector, clock: &'a dyn Clock) -> Self {
        Self { connector, clock }
    }

    /// Resolves a number, `q7` or slug, then runs it.
    pub async fn run_key(&self, key: &str) -> Result<Report, FoodshareError> {
        let query = catalog::find(key)?;
        self.run(query).await
    }

    #[instrument(skip(self, query), fields(query = %query.slug))]
    pub async fn run(&self, query: &'static CatalogQuery) -> Result<Report, FoodshareError> {
        let as_of = self.clock.today();
        let params = if query.uses_clock {
            vec![Cell::Date(as_of)]
        } else {
            Vec::new()
        };

        let start = Instant::now();
        let result = fetch(self.connector, query.sql, &params)
            .await
            .map_err(|e| DomainError::QueryFailure {
                query: query.label(),
                reason: e.to_string(),
            })?;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!("📊 {}: {} rows in {}ms", query.label(), result.len(), elapsed_ms);
        Ok(Report {
            query,
            as_of,
            generated_at: self.clock.now(),
            elapsed_ms,
            result,
        })
    }

    /// Runs the whole catalog in order. A failing query is logged and left out.
    #[instrument(skip(self))]
    pub async fn run_all(&self) -> BatchReport {
        let mut batch = BatchReport::default();
        for query in CATALOG.iter() {
            match self.run(query).await {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    error!("❌ {}", e);
                    batch.failures.push(FailedQuery {
                        query,
                        reason: e.to_string(),
                    });
                }
            }
        }
        info!("🏁 Catalog run: {}", batch.summary());
        batch
    }
}
