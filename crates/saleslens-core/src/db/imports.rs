//! CSV ingestion and import history

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{info, warn};

use super::sales::insert_rows;
use super::Database;
use crate::error::{Error, Result};
use crate::import::{file_hash, parse_sales};
use crate::models::{ImportSession, ImportSummary};

impl Database {
    /// Parse a sales CSV and store every row
    ///
    /// The file is rejected as a duplicate when an earlier import has the same
    /// SHA-256, unless `force` is set. Parsing finishes before anything is
    /// written. The duplicate check, the session row and every sale line
    /// share one immediate transaction, so concurrent uploads of the same
    /// file cannot both pass the check and a failed insert leaves nothing
    /// behind.
    pub fn import_csv(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
        user_email: Option<&str>,
        force: bool,
    ) -> Result<ImportSummary> {
        let hash = file_hash(bytes);
        let sales = parse_sales(bytes)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = latest_import_by_hash(&tx, &hash)? {
            if force {
                warn!(
                    import_id = existing.id,
                    "Re-importing a file that was already imported"
                );
            } else {
                return Err(Error::DuplicateImport {
                    import_id: existing.id,
                    file_hash: hash,
                });
            }
        }

        tx.execute(
            r#"
            INSERT INTO import_sessions (filename, file_hash, file_size_bytes, user_email)
            VALUES (?, ?, ?, ?)
            "#,
            params![filename, hash, bytes.len() as i64, user_email],
        )?;
        let session_id = tx.last_insert_rowid();

        let inserted = insert_rows(&tx, &sales, Some(session_id))?;

        tx.execute(
            "UPDATE import_sessions SET rows_inserted = ? WHERE id = ?",
            params![inserted as i64, session_id],
        )?;
        tx.commit()?;

        info!(
            import_id = session_id,
            rows = inserted,
            "Imported {}",
            filename.unwrap_or("sales CSV")
        );

        Ok(ImportSummary {
            import_id: session_id,
            filename: filename.map(String::from),
            rows_inserted: inserted,
            file_hash: hash,
        })
    }

    /// Most recent import of a file with this hash
    pub fn find_import_by_hash(&self, file_hash: &str) -> Result<Option<ImportSession>> {
        let conn = self.conn()?;
        latest_import_by_hash(&conn, file_hash)
    }

    /// Import history, newest first
    pub fn list_import_sessions(&self, limit: i64) -> Result<Vec<ImportSession>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, filename, file_hash, rows_inserted, created_at
            FROM import_sessions
            ORDER BY id DESC
            LIMIT ?
            "#,
        )?;

        let sessions = stmt
            .query_map(params![limit], row_to_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }
}

fn latest_import_by_hash(conn: &Connection, file_hash: &str) -> Result<Option<ImportSession>> {
    let session = conn
        .query_row(
            r#"
            SELECT id, filename, file_hash, rows_inserted, created_at
            FROM import_sessions
            WHERE file_hash = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
            params![file_hash],
            row_to_session,
        )
        .optional()?;
    Ok(session)
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<ImportSession> {
    Ok(ImportSession {
        id: row.get(0)?,
        filename: row.get(1)?,
        file_hash: row.get(2)?,
        rows_inserted: row.get(3)?,
        imported_at: row.get(4)?,
    })
}
