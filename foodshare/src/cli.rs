// foodshare/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use foodshare_core::application::ExportFormat;

#[derive(Parser)]
#[command(name = "foodshare")]
#[command(about = "Food surplus redistribution: CSV ingestion, integrity checks and SQL reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory (holds foodshare.yaml)
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportArg {
    Json,
    Csv,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Json => ExportFormat::Json,
            ExportArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🏗️  Creates the project file (if missing), the tables and their indexes
    Init {
        #[command(flatten)]
        project: ProjectArgs,

        /// Drop the four tables first (all data is lost)
        #[arg(long)]
        reset: bool,
    },

    /// 📥 Replaces the tables with the content of the CSV sources
    Load {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// 🔎 Checks references and primary keys of the loaded data
    Verify {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// 📚 Lists the available reports
    Catalog,

    /// 📊 Runs one report (number or slug) or the whole catalog
    Query {
        #[command(flatten)]
        project: ProjectArgs,

        /// Report number ("7", "q7") or slug ("common-food-types")
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        key: Option<String>,

        /// Run the fifteen reports in order
        #[arg(long)]
        all: bool,

        /// Reference date for expiry comparisons (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Also write each report under <target>/reports/
        #[arg(long, value_enum)]
        export: Option<ExportArg>,
    },

    /// 🏪 Provider directory with donation and claim totals
    Providers {
        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long)]
        city: Option<String>,

        /// Provider type (Restaurant, Supermarket...)
        #[arg(long = "type")]
        provider_type: Option<String>,
    },

    /// 🥗 Food listings with their expiry status
    Listings {
        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        food_type: Option<String>,

        #[arg(long)]
        meal_type: Option<String>,

        /// Reference date for expiry status (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// 🩺 Row counts, orphaned listings and recent activity
    Status {
        #[command(flatten)]
        project: ProjectArgs,

        /// Reference date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}
