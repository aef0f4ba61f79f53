// foodshare-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Missing source for '{table}': {path}")]
    #[diagnostic(
        code(foodshare::domain::missing_source),
        help("Place the CSV file in the data directory, then rerun `foodshare load`.")
    )]
    MissingSource { table: String, path: String },

    #[error("Integrity violation on '{table}': {detail}")]
    #[diagnostic(
        code(foodshare::domain::integrity),
        help("Fix the referenced rows in the source files and rerun `foodshare load`.")
    )]
    IntegrityViolation { table: String, detail: String },

    #[error("Query '{query}' failed: {reason}")]
    #[diagnostic(code(foodshare::domain::query))]
    QueryFailure { query: String, reason: String },

    #[error("Invalid record in '{table}' (line {line}): {reason}")]
    #[diagnostic(code(foodshare::domain::invalid_record))]
    InvalidRecord {
        table: String,
        line: u64,
        reason: String,
    },

    #[error("Unknown catalog query '{0}'")]
    #[diagnostic(
        code(foodshare::domain::unknown_query),
        help("Run `foodshare catalog` to list the available queries.")
    )]
    UnknownQuery(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(
        code(foodshare::domain::schema),
        help("Run `foodshare init` to create the tables.")
    )]
    SchemaError(String),
}
