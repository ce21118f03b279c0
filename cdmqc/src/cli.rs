// cdmqc/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};

use cdmqc_core::domain::dates::Granularity;

#[derive(Parser)]
#[command(name = "cdmqc")]
#[command(about = "CDM data quality checks and refresh comparison reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🗂  Lists the CDM snapshot schemas available in the warehouse
    Schemas,

    /// 📖 Prints the CDM table catalogue (keys, linkage, temporal columns)
    Describe,

    /// 🔎 Runs the integrity checks (1.05 - 1.12) against one schema
    Checks {
        /// Schema holding the CDM snapshot
        #[arg(long, short)]
        schema: String,

        /// Cutoff date YYYY-MM-DD (default: today). The windowed checks look
        /// back ten years from it.
        #[arg(long)]
        cutoff: Option<String>,
    },

    /// 🔁 Compares two refresh snapshots (checks 4.01 - 4.03)
    Persistence {
        /// Schema of the previous refresh
        #[arg(long)]
        previous: String,

        /// Schema of the current refresh
        #[arg(long)]
        current: String,

        /// Cutoff date YYYY-MM-DD (default: today)
        #[arg(long)]
        cutoff: Option<String>,
    },

    /// 🧾 Demographic summary and patient pools for one schema
    Summary {
        /// Schema holding the CDM snapshot
        #[arg(long, short)]
        schema: String,

        /// Reference date YYYY-MM-DD anchoring the cohort windows
        /// (default: today)
        #[arg(long)]
        reference: Option<String>,
    },

    /// 📈 Record-volume trend for one CDM table
    Trend {
        /// Schema holding the CDM snapshot
        #[arg(long, short)]
        schema: String,

        /// CDM table to bin (ex: "ENCOUNTER")
        #[arg(long, short)]
        table: String,

        /// Bucket size
        #[arg(long, value_enum, default_value_t = TrendInterval::Yearly)]
        interval: TrendInterval,

        /// Range start YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Range end YYYY-MM-DD
        #[arg(long)]
        end: String,
    },

    /// ⚡ Executes a raw SQL query (Ad-hoc)
    Query {
        query: String,
        #[arg(long, default_value = "cdmqc.duckdb")]
        db_path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrendInterval {
    Yearly,
    Monthly,
    Daily,
}

impl From<TrendInterval> for Granularity {
    fn from(interval: TrendInterval) -> Self {
        match interval {
            TrendInterval::Yearly => Granularity::Yearly,
            TrendInterval::Monthly => Granularity::Monthly,
            TrendInterval::Daily => Granularity::Daily,
        }
    }
}
