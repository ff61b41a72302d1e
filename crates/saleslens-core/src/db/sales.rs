//! Sale line storage and monthly aggregation

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::{DateRange, MonthlyTotals, NewSale, Sale, YearMonth};

/// Rows written per transaction during ingestion
pub const INSERT_BATCH_SIZE: usize = 1000;

fn date_param(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn row_to_sale(row: &Row) -> rusqlite::Result<Sale> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Sale {
        id: row.get(0)?,
        record: NewSale {
            date,
            invoice_number: row.get(2)?,
            transaction_number: row.get(3)?,
            customer_code: row.get(4)?,
            customer_name: row.get(5)?,
            rep_code: row.get(6)?,
            rep_name: row.get(7)?,
            product_code: row.get(8)?,
            product_name: row.get(9)?,
            department: row.get(10)?,
            quantity: row.get(11)?,
            value: row.get(12)?,
            cost: row.get(13)?,
        },
    })
}

/// Write sale lines on `conn`, tagged with the import that produced them
///
/// The caller owns the transaction.
pub(crate) fn insert_rows(
    conn: &Connection,
    sales: &[NewSale],
    import_session_id: Option<i64>,
) -> Result<usize> {
    let mut stmt = conn.prepare_cached(
        r#"
        INSERT INTO sales (
            date, invoice_number, transaction_number, customer_code, customer_name,
            rep_code, rep_name, product_code, product_name, department,
            quantity, value, cost, import_session_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;

    for sale in sales {
        stmt.execute(params![
            sale.date.format("%Y-%m-%d").to_string(),
            sale.invoice_number,
            sale.transaction_number,
            sale.customer_code,
            sale.customer_name,
            sale.rep_code,
            sale.rep_name,
            sale.product_code,
            sale.product_name,
            sale.department,
            sale.quantity,
            sale.value,
            sale.cost,
            import_session_id,
        ])?;
    }

    Ok(sales.len())
}

impl Database {
    /// Store sale lines, returning how many were written
    ///
    /// Writes in batches of [`INSERT_BATCH_SIZE`], one transaction per batch.
    pub fn insert_sales(&self, sales: &[NewSale]) -> Result<usize> {
        let mut conn = self.conn()?;
        let mut inserted = 0;

        for batch in sales.chunks(INSERT_BATCH_SIZE) {
            let tx = conn.transaction()?;
            insert_rows(&tx, batch, None)?;
            tx.commit()?;

            inserted += batch.len();
            debug!("Inserted batch of {} sales ({} total)", batch.len(), inserted);
        }

        Ok(inserted)
    }

    /// Number of stored sale lines
    pub fn count_sales(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Sale lines within a date range, oldest first
    pub fn list_sales(&self, range: &DateRange, limit: i64) -> Result<Vec<Sale>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, date, invoice_number, transaction_number, customer_code, customer_name,
                   rep_code, rep_name, product_code, product_name, department,
                   quantity, value, cost
            FROM sales
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            ORDER BY date, id
            LIMIT ?3
            "#,
        )?;

        let sales = stmt
            .query_map(
                params![date_param(range.from), date_param(range.to), limit],
                row_to_sale,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sales)
    }

    /// Monthly totals within a date range, ordered by year then month
    ///
    /// Months without sales are absent. Missing costs count as zero.
    pub fn fetch_monthly_totals(&self, range: &DateRange) -> Result<Vec<MonthlyTotals>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                CAST(strftime('%Y', date) AS INTEGER) AS year,
                CAST(strftime('%m', date) AS INTEGER) AS month,
                COUNT(*),
                COALESCE(SUM(quantity), 0.0),
                COALESCE(SUM(value), 0.0),
                COALESCE(SUM(COALESCE(cost, 0.0)), 0.0)
            FROM sales
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            GROUP BY year, month
            ORDER BY year, month
            "#,
        )?;

        let totals = stmt
            .query_map(params![date_param(range.from), date_param(range.to)], |row| {
                Ok(MonthlyTotals {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    total_sales: row.get(2)?,
                    total_items: row.get(3)?,
                    total_value: row.get(4)?,
                    total_cost: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Fetched {} monthly totals", totals.len());
        Ok(totals)
    }

    /// Totals for one month; zeros when the month has no sales
    pub fn get_month_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals> {
        let ym = YearMonth::new(year, month)?;
        let totals = self.fetch_monthly_totals(&DateRange::month(ym))?;

        Ok(totals
            .into_iter()
            .next()
            .unwrap_or_else(|| MonthlyTotals::empty(ym)))
    }
}
