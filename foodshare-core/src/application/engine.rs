// foodshare-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::report::{Cell, ResultSet};
use crate::error::FoodshareError;
use crate::ports::connector::Connector;

/// Runs one statement with timing logs. Returns the affected row count.
#[instrument(skip(connector), fields(sql.len = sql.len()))]
pub async fn execute_query(connector: &dyn Connector, sql: &str) -> Result<u64, FoodshareError> {
    let start = Instant::now();
    debug!("⚡ Executing: {}", sql);

    let result = connector.execute(sql).await;
    log_outcome(start, result.as_ref().map(|n| *n as usize));
    result
}

/// Runs a read with bound parameters and timing logs.
#[instrument(skip(connector, params), fields(sql.len = sql.len(), params = params.len()))]
pub async fn fetch(
    connector: &dyn Connector,
    sql: &str,
    params: &[Cell],
) -> Result<ResultSet, FoodshareError> {
    let start = Instant::now();
    debug!("⚡ Querying: {}", sql);

    let result = connector.query(sql, params).await;
    log_outcome(start, result.as_ref().map(ResultSet::len));
    result
}

fn log_outcome(start: Instant, outcome: Result<usize, &FoodshareError>) {
    let duration = start.elapsed();
    match outcome {
        Ok(rows) => debug!(rows, "✅ Finished in {:.2?}", duration),
        // Logged here for the timing context; the caller still gets the error
        Err(e) => error!("❌ Failed after {:.2?}: {}", duration, e),
    }
}
