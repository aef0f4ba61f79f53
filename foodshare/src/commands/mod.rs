// foodshare/src/commands/mod.rs

pub mod catalog;
pub mod context;
pub mod init;
pub mod listings;
pub mod load;
pub mod providers;
pub mod query;
pub mod status;
pub mod table;
pub mod verify;
