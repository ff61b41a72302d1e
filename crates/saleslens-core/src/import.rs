//! CSV import parser for sales exports
//!
//! The export has one line per invoiced item with the columns listed in
//! [`COLUMNS`]. Numbers may use a decimal comma. The first failing row aborts
//! the whole parse, so a file is either accepted completely or not at all.

use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::NewSale;

/// Header names of the sales export, in their usual order
pub const COLUMNS: [&str; 13] = [
    "data",
    "num_nota_saida",
    "numero_transacao_venda",
    "cod_cliente",
    "nome_cliente",
    "cod_rca",
    "nome_rca",
    "cod_produto",
    "nome_produto",
    "dpto_produto",
    "qtd_itens",
    "valor",
    "custo_mercadoria_vendida",
];

/// SHA-256 of the raw file, hex encoded
pub fn file_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Header lookup so columns may appear in any order
struct Columns(HashMap<String, usize>);

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_string(), i))
                .collect(),
        )
    }

    /// Trimmed, non-empty cell for `name`
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Parse a sales CSV into records
///
/// Errors carry the 1-based record number, counting the header as row 1.
pub fn parse_sales<R: Read>(reader: R) -> Result<Vec<NewSale>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);
    let mut sales = Vec::new();

    // Rows count parsed records, so blank lines and multi-line cells do not shift them
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 2;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let sale =
            parse_row(&columns, &record).map_err(|message| Error::Import { row, message })?;
        sales.push(sale);
    }

    debug!("Parsed {} sale rows", sales.len());
    Ok(sales)
}

fn parse_row(columns: &Columns, record: &StringRecord) -> std::result::Result<NewSale, String> {
    let date = columns
        .get(record, "data")
        .ok_or_else(|| "Missing date".to_string())?;
    let date = parse_date(date).ok_or_else(|| format!("Unable to parse date: {}", date))?;

    let number = |field: &str| -> std::result::Result<f64, String> {
        let raw = columns
            .get(record, field)
            .ok_or_else(|| format!("Missing field {}", field))?;
        parse_number(raw).ok_or_else(|| format!("Invalid number in {}", field))
    };
    let code = |field: &str| -> std::result::Result<i64, String> {
        let value = number(field)?;
        if value.fract() != 0.0 {
            return Err(format!("Invalid number in {}", field));
        }
        Ok(value as i64)
    };
    let text = |field: &str| columns.get(record, field).unwrap_or_default().to_string();

    Ok(NewSale {
        date,
        invoice_number: code("num_nota_saida")?,
        transaction_number: code("numero_transacao_venda")?,
        customer_code: code("cod_cliente")?,
        customer_name: text("nome_cliente"),
        rep_code: code("cod_rca")?,
        rep_name: text("nome_rca"),
        product_code: code("cod_produto")?,
        product_name: text("nome_produto"),
        department: columns.get(record, "dpto_produto").map(String::from),
        quantity: number("qtd_itens")?,
        value: number("valor")?,
        cost: columns
            .get(record, "custo_mercadoria_vendida")
            .and_then(parse_number),
    })
}

/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and RFC 3339 timestamps
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a number that may use a decimal comma
///
/// With both separators present the dot is read as a thousands separator
/// (`1.234,56`).
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
