//! SalesLens CLI - Sales analytics and forecasting
//!
//! Usage:
//!   saleslens init                     Initialize database
//!   saleslens import --file sales.csv  Import a sales export
//!   saleslens insights --yearly        Yearly insights
//!   saleslens forecast --periods 6     Forecast total value
//!   saleslens serve --port 3000        Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import { file, force } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file, force)
        }
        Commands::Metrics {
            year,
            month,
            from,
            to,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match (year, month) {
                (Some(year), Some(month)) => commands::cmd_metrics_month(&db, year, month),
                _ => commands::cmd_metrics(&db, from.as_deref(), to.as_deref()),
            }
        }
        Commands::Insights { yearly, from, to } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            if yearly {
                commands::cmd_insights_yearly(&db)
            } else {
                commands::cmd_insights(&db, from.as_deref(), to.as_deref())
            }
        }
        Commands::Forecast {
            metric,
            periods,
            chart,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_forecast(&db, &metric, periods, chart, json)
        }
        Commands::Imports { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_imports(&db, limit)
        }
        Commands::Audit { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, limit)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
    }
}
