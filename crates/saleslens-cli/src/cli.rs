//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SalesLens - Sales metrics, insights and forecasts
#[derive(Parser)]
#[command(name = "saleslens")]
#[command(about = "Self-hosted sales analytics and forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "saleslens.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SALESLENS_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import sales from a CSV export
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Import even if the same file was imported before
        #[arg(long)]
        force: bool,
    },

    /// Show monthly totals
    Metrics {
        /// Year of a single month (requires --month)
        #[arg(long, requires = "month")]
        year: Option<i32>,

        /// Month number 1-12 (requires --year)
        #[arg(long, requires = "year")]
        month: Option<u32>,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long, conflicts_with = "year")]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long, conflicts_with = "year")]
        to: Option<String>,
    },

    /// Show monthly or yearly insights
    Insights {
        /// Roll months up into years
        #[arg(long)]
        yearly: bool,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Forecast a metric
    Forecast {
        /// Metric: totalValue, totalSales, totalItems, totalCost, grossProfit
        #[arg(short, long, default_value = "totalValue")]
        metric: String,

        /// Number of months to forecast (1-24)
        #[arg(short, long, default_value = "3")]
        periods: usize,

        /// Show one row per future month instead of one row per method
        #[arg(long)]
        chart: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List import history
    Imports {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// View audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,
    },
}
