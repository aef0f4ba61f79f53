// foodshare-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodshareError {
    // --- ERREURS DU DOMAINE (Sources, Intégrité, Catalogue) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (DuckDB, IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl FoodshareError {
    /// True when the engine rejected a write because of a PK / FK / CHECK constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            FoodshareError::Infrastructure(InfrastructureError::Database(db)) if db.is_constraint_violation()
        )
    }
}

// Manual implementations to keep `?` ergonomic on the most common leaf errors
impl From<std::io::Error> for FoodshareError {
    fn from(err: std::io::Error) -> Self {
        FoodshareError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<DatabaseError> for FoodshareError {
    fn from(err: DatabaseError) -> Self {
        FoodshareError::Infrastructure(InfrastructureError::Database(err))
    }
}

impl From<duckdb::Error> for FoodshareError {
    fn from(err: duckdb::Error) -> Self {
        FoodshareError::Infrastructure(InfrastructureError::from(err))
    }
}
