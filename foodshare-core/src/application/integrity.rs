// foodshare-core/src/application/integrity.rs

use tracing::{info, instrument, warn};

use crate::application::engine::fetch;
use crate::domain::error::DomainError;
use crate::domain::integrity::{IntegrityFinding, IntegrityReport, IntegrityRule, rules};
use crate::error::FoodshareError;
use crate::ports::connector::Connector;

/// Runs every reference and uniqueness rule against the current store.
///
/// Advisory only: nothing is rolled back. A rule that cannot run (for example
/// because its table is missing) is listed as skipped instead of failing the pass.
#[instrument(skip(connector))]
pub async fn verify_integrity(connector: &dyn Connector) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for rule in rules() {
        match check(connector, &rule).await {
            Ok(finding) => {
                if !finding.passed() {
                    let violation = DomainError::IntegrityViolation {
                        table: rule.table.to_string(),
                        detail: format!(
                            "{}: {} violation(s), ids {:?}",
                            rule.name, finding.violations, finding.sample_ids
                        ),
                    };
                    warn!("❌ {}", violation);
                }
                report.findings.push(finding);
            }
            Err(e) => {
                warn!("⚠️  Integrity rule '{}' skipped: {}", rule.name, e);
                report.skipped.push(format!("{}: {}", rule.name, e));
            }
        }
    }

    if report.is_clean() && report.skipped.is_empty() {
        info!("✅ Integrity verified ({} checks)", report.findings.len());
    }
    report
}

async fn check(connector: &dyn Connector, rule: &IntegrityRule) -> Result<IntegrityFinding, FoodshareError> {
    let violations = connector.query_scalar(&rule.count_sql()).await?;
    let sample_ids = if violations > 0 {
        fetch(connector, &rule.sample_sql(), &[])
            .await?
            .rows
            .iter()
            .filter_map(|row| row.first().and_then(|c| c.as_i64()))
            .collect()
    } else {
        Vec::new()
    };

    Ok(IntegrityFinding {
        check: rule.name.clone(),
        table: rule.table,
        kind: rule.kind,
        violations,
        sample_ids,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::domain::schema::TableName;
    use crate::infrastructure::adapters::DuckDBConnector;
    use anyhow::Result;

    #[tokio::test]
    async fn test_loaded_store_is_clean() -> Result<()> {
        let connector = fixtures::loaded_store().await?;
        let report = verify_integrity(&connector).await;
        assert!(report.is_clean());
        assert!(report.skipped.is_empty());
        assert_eq!(report.findings.len(), 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_orphans_are_counted_and_sampled() -> Result<()> {
        // Unconstrained copies of the tables, so orphans can exist at all
        let connector = DuckDBConnector::in_memory()?;
        for sql in [
            "CREATE TABLE providers (provider_id INTEGER)",
            "CREATE TABLE receivers (receiver_id INTEGER)",
            "CREATE TABLE food_listings (food_id INTEGER, provider_id INTEGER)",
            "CREATE TABLE claims (claim_id INTEGER, food_id INTEGER, receiver_id INTEGER)",
            "INSERT INTO providers VALUES (1)",
            "INSERT INTO food_listings VALUES (10, 1), (11, 2), (12, 3)",
            "INSERT INTO claims VALUES (100, 10, 7), (100, 10, 7)",
        ] {
            connector.execute(sql).await?;
        }

        let report = verify_integrity(&connector).await;
        assert!(!report.is_clean());

        let orphaned_listings = report
            .findings
            .iter()
            .find(|f| f.check == "food_listings.provider_id -> providers")
            .unwrap();
        assert_eq!(orphaned_listings.violations, 2);
        assert_eq!(orphaned_listings.sample_ids, vec![11, 12]);

        let dangling_receivers = report
            .violations()
            .find(|f| f.check == "claims.receiver_id -> receivers")
            .unwrap();
        assert_eq!(dangling_receivers.violations, 2);

        let duplicate_claims = report
            .violations()
            .find(|f| f.table == TableName::Claims && f.check.ends_with("unique"))
            .unwrap();
        assert_eq!(duplicate_claims.sample_ids, vec![100]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_tables_are_skipped() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        let report = verify_integrity(&connector).await;
        assert!(report.findings.is_empty());
        assert_eq!(report.skipped.len(), 7);
        Ok(())
    }
}
