//! Import command implementations

use std::path::Path;

use anyhow::{Context, Result};
use saleslens_core::{Database, Error};
use tracing::debug;

use super::truncate;

pub fn cmd_import(db: &Database, file: &Path, force: bool) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file.file_name().and_then(|n| n.to_str());
    debug!(bytes = bytes.len(), "Read CSV file");

    let summary = match db.import_csv(&bytes, filename, Some("cli"), force) {
        Ok(summary) => summary,
        Err(Error::DuplicateImport { import_id, .. }) => {
            println!(
                "⚠️  This file was already imported (import #{}). Use --force to import it again.",
                import_id
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Import failed"),
    };

    db.log_audit(
        "cli",
        "upload",
        Some("import"),
        Some(summary.import_id),
        summary.filename.as_deref(),
    )?;

    println!("✅ Import complete!");
    println!("   Rows inserted: {}", summary.rows_inserted);
    println!("   Import ID:     {}", summary.import_id);
    println!("   File hash:     {}", &summary.file_hash[..12.min(summary.file_hash.len())]);

    Ok(())
}

pub fn cmd_imports(db: &Database, limit: i64) -> Result<()> {
    let sessions = db.list_import_sessions(limit)?;

    if sessions.is_empty() {
        println!("No imports yet. Run: saleslens import --file sales.csv");
        return Ok(());
    }

    println!("📦 Import history ({} entries)", sessions.len());
    println!();
    println!(
        "{:>5}  {:<20}  {:<30}  {:>8}  {}",
        "ID", "Imported", "File", "Rows", "Hash"
    );
    println!("{}", "-".repeat(84));

    for session in &sessions {
        let filename = session.filename.as_deref().unwrap_or("(upload)");
        println!(
            "{:>5}  {:<20}  {:<30}  {:>8}  {}",
            session.id,
            truncate(&session.imported_at, 20),
            truncate(filename, 30),
            session.rows_inserted,
            &session.file_hash[..12.min(session.file_hash.len())]
        );
    }

    Ok(())
}
