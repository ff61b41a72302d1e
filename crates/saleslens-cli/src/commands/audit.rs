//! Audit log viewer

use anyhow::Result;
use saleslens_core::Database;

use super::truncate;

pub fn cmd_audit(db: &Database, limit: i64) -> Result<()> {
    let entries = db.list_audit_log(limit)?;

    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    println!("🧾 Audit log ({} entries)", entries.len());
    println!();
    println!(
        "{:<20}  {:<12}  {:<8}  {:<20}  {}",
        "Timestamp", "User", "Action", "Entity", "Details"
    );
    println!("{}", "-".repeat(90));

    for entry in &entries {
        let entity = match (&entry.entity_type, entry.entity_id) {
            (Some(t), Some(id)) => format!("{}#{}", t, id),
            (Some(t), None) => t.clone(),
            _ => "-".to_string(),
        };
        println!(
            "{:<20}  {:<12}  {:<8}  {:<20}  {}",
            truncate(&entry.timestamp, 20),
            truncate(&entry.user_email, 12),
            truncate(&entry.action, 8),
            truncate(&entity, 20),
            entry.details.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
