pub mod catalog;
pub mod clock;
pub mod entity;
pub mod error;
pub mod filter;
pub mod integrity;
pub mod project;
pub mod report;
pub mod schema;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use report::{Cell, ResultSet};
pub use schema::TableName;
