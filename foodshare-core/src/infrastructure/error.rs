// foodshare-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(foodshare::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Cannot open store at '{path}': {source}")]
    #[diagnostic(
        code(foodshare::infra::database::connection),
        help("Check that the database path is writable and not locked by another process.")
    )]
    ConnectionFailure {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Store connection lock poisoned")]
    #[diagnostic(code(foodshare::infra::database::poisoned))]
    Poisoned,
}

impl DatabaseError {
    /// DuckDB reports PK / FK / CHECK failures as "Constraint Error: ..." on append,
    /// or as "... constraint violated ..." when detected at commit.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            DatabaseError::DuckDB(e) => e.to_string().to_lowercase().contains("constraint"),
            _ => false,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(foodshare::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- SOURCES (CSV) ---
    #[error("CSV Error: {0}")]
    #[diagnostic(
        code(foodshare::infra::csv),
        help("Check that the file has a header row and comma separated fields.")
    )]
    Csv(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(foodshare::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(foodshare::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(
        code(foodshare::infra::config_missing),
        help("Create a foodshare.yaml in the project directory.")
    )]
    ConfigNotFound(String),

    #[error("Serialization Error: {0}")]
    #[diagnostic(code(foodshare::infra::json))]
    Json(#[from] serde_json::Error),
}

// Shortcut so `?` works directly on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
