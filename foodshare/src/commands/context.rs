// foodshare/src/commands/context.rs
//
// Project loading and store access shared by every command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use foodshare_core::domain::clock::{Clock, FixedClock, SystemClock};
use foodshare_core::domain::project::ProjectConfig;
use foodshare_core::infrastructure::adapters::DuckDBConnector;
use foodshare_core::infrastructure::config::{load_project_config, resolve};

pub struct Workspace {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Workspace {
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;
        Ok(Self {
            root: project_dir.to_path_buf(),
            config,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        resolve(&self.root, &self.config.database_path)
    }

    pub fn data_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.data_path)
    }

    pub fn target_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.target_path)
    }

    pub fn connect(&self) -> Result<DuckDBConnector> {
        let db_path = self.database_path();
        DuckDBConnector::new(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to open DuckDB at {}", db_path.display()))
    }
}

/// `--as-of` freezes "now" at midnight of that day; otherwise the wall clock.
pub fn clock_for(as_of: Option<NaiveDate>) -> Box<dyn Clock> {
    match as_of {
        Some(day) => Box::new(FixedClock::on(day)),
        None => Box::new(SystemClock),
    }
}
