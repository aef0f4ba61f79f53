// foodshare-core/src/infrastructure/sources.rs

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};
use validator::Validate;
use walkdir::WalkDir;

use crate::domain::entity::TableRecord;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;

/// A source row that was skipped, with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug)]
pub struct CsvBatch<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

/// Looks for `file_name` directly under `data_dir`, then anywhere below it.
pub fn locate_source(data_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let direct = data_dir.join(file_name);
    if direct.is_file() {
        return Some(direct);
    }

    WalkDir::new(data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
}

/// "Provider ID" / "Provider_ID" -> "provider_id"
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// Reads and validates every record of a CSV source.
///
/// Only I/O failures abort the read. Records that cannot be coerced, fail
/// validation or repeat a primary key are rejected individually.
#[instrument(skip_all, fields(table = %T::TABLE, path = %path.display()))]
pub fn read_records<T: TableRecord>(path: &Path) -> Result<CsvBatch<T>, InfrastructureError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        // header is line 1
        let fallback_line = idx as u64 + 2;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                rejected.push(reject::<T>(line, e.to_string()));
                continue;
            }
        };

        let line = raw.position().map_or(fallback_line, |p| p.line());
        if raw.iter().all(str::is_empty) {
            continue;
        }

        let record: T = match raw.deserialize(Some(&headers)) {
            Ok(record) => record,
            Err(e) => {
                rejected.push(reject::<T>(line, e.to_string()));
                continue;
            }
        };

        if let Err(errors) = record.validate() {
            rejected.push(reject::<T>(line, errors.to_string()));
            continue;
        }

        let key = record.primary_key();
        if !seen.insert(key) {
            rejected.push(reject::<T>(line, format!("duplicate {} {}", T::TABLE.primary_key(), key)));
            continue;
        }

        records.push(record);
    }

    debug!(valid = records.len(), rejected = rejected.len(), "Source parsed");
    Ok(CsvBatch { records, rejected })
}

fn reject<T: TableRecord>(line: u64, reason: String) -> RejectedRecord {
    let error = DomainError::InvalidRecord {
        table: T::TABLE.to_string(),
        line,
        reason: reason.clone(),
    };
    warn!("⚠️  {}", error);
    RejectedRecord { line, reason }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entity::{Claim, ClaimStatus, FoodListing, FoodType, Provider};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_provider_contact_sentinel_and_header_normalization() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("providers_data.csv");
        fs::write(
            &path,
            "Provider_ID,Name,Type,Address,City,Contact\n\
             1,Green Deli,Restaurant,12 Main St,Metro,555-0100\n\
             2,Corner Shop,Grocery Store,3 Side Rd,Metro,\n",
        )?;

        let batch = read_records::<Provider>(&path)?;
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].provider_type, "Restaurant");
        assert_eq!(batch.records[1].contact, "");
        Ok(())
    }

    #[test]
    fn test_invalid_rows_are_rejected_with_line_numbers() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("food_listings_data.csv");
        fs::write(
            &path,
            "food_id,food_name,quantity,expiry_date,provider_id,provider_type,location,food_type,meal_type\n\
             10,Bread,5,2025-03-17,1,Restaurant,Metro,Vegan,Lunch\n\
             11,Soup,0,2025-03-17,1,Restaurant,Metro,Vegan,Dinner\n\
             12,Rice,3,2025-03-17,1,Restaurant,Metro,Halal,Dinner\n\
             13,Milk,2,someday,1,Restaurant,Metro,Vegetarian,Breakfast\n\
             10,Bread again,4,2025-03-18,1,Restaurant,Metro,Vegan,Lunch\n",
        )?;

        let batch = read_records::<FoodListing>(&path)?;
        assert_eq!(batch.records.len(), 1);
        let listing = &batch.records[0];
        assert_eq!(listing.food_type, FoodType::Vegan);
        assert!(listing.is_available);

        let lines: Vec<u64> = batch.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
        assert!(batch.rejected[0].reason.contains("quantity"));
        assert!(batch.rejected[3].reason.contains("duplicate food_id 10"));
        Ok(())
    }

    #[test]
    fn test_claim_timestamps_are_coerced() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("claims_data.csv");
        fs::write(
            &path,
            "claim_id,food_id,receiver_id,status,timestamp\n\
             100,10,7,Completed,2025-03-05 05:26:00\n\
             101,10,7,Pending,3/5/2025 5:26\n",
        )?;

        let batch = read_records::<Claim>(&path)?;
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].status, ClaimStatus::Completed);
        assert_eq!(batch.records[0].timestamp, batch.records[1].timestamp);
        Ok(())
    }

    #[test]
    fn test_locate_source_searches_subdirectories() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("processed");
        fs::create_dir_all(&nested)?;
        fs::write(nested.join("claims_data.csv"), "claim_id\n")?;

        let found = locate_source(dir.path(), "claims_data.csv");
        assert_eq!(found, Some(nested.join("claims_data.csv")));
        assert!(locate_source(dir.path(), "providers_data.csv").is_none());
        Ok(())
    }
}
