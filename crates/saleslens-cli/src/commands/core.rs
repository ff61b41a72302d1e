//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `parse_date_arg` - YYYY-MM-DD parsing for range flags
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use saleslens_core::{DateRange, Database};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Parse a YYYY-MM-DD command-line date
pub fn parse_date_arg(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid --{} date: {} (expected YYYY-MM-DD)", name, value))
}

/// Build an inclusive range from optional --from/--to flags
pub fn parse_range_args(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let from = from.map(|v| parse_date_arg("from", v)).transpose()?;
    let to = to.map(|v| parse_date_arg("to", v)).transpose()?;
    Ok(DateRange::new(from, to)?)
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    // Migrations run on open
    let db = open_db(db_path, no_encrypt)?;
    let sales = db.count_sales().context("Failed to read sales table")?;
    println!("   {} sales stored", sales);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import sales: saleslens import --file sales.csv");
    println!("  2. Review insights: saleslens insights");
    println!("  3. Start web API: saleslens serve");

    Ok(())
}
