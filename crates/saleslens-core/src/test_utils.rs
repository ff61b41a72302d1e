//! Test fixtures for saleslens-core
//!
//! Shared by the unit tests here and by the server and CLI test suites
//! through the `test-utils` feature.

use chrono::NaiveDate;

use crate::db::Database;
use crate::import::COLUMNS;
use crate::models::NewSale;

/// One sale line on the given day
pub fn sale(year: i32, month: u32, day: u32, quantity: f64, value: f64, cost: Option<f64>) -> NewSale {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"));
    NewSale::simple(date, quantity, value, cost)
}

/// Two sales per month from January 2023 through `months` months
///
/// Month `i` (0-based) has values `100 + 10*i` and `50`, quantity 1 each
/// and a cost of 60% of the value.
pub fn monthly_history(months: usize) -> Vec<NewSale> {
    (0..months)
        .flat_map(|i| {
            let year = 2023 + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            let value = 100.0 + 10.0 * i as f64;
            [
                sale(year, month, 3, 1.0, value, Some(value * 0.6)),
                sale(year, month, 17, 1.0, 50.0, Some(30.0)),
            ]
        })
        .collect()
}

/// Render sales as an export CSV with the standard header
pub fn sales_csv(sales: &[NewSale]) -> String {
    let mut out = COLUMNS.join(",");
    for (i, s) in sales.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            s.date.format("%Y-%m-%d"),
            1000 + i,
            5000 + i,
            s.customer_code,
            s.customer_name,
            s.rep_code,
            s.rep_name,
            s.product_code,
            s.product_name,
            s.department.as_deref().unwrap_or(""),
            s.quantity,
            s.value,
            s.cost.map(|c| c.to_string()).unwrap_or_default(),
        ));
    }
    out.push('\n');
    out
}

/// A small CSV in the export's native style (decimal commas, DD/MM/YYYY)
pub const SAMPLE_CSV: &str = "\
data,num_nota_saida,numero_transacao_venda,cod_cliente,nome_cliente,cod_rca,nome_rca,cod_produto,nome_produto,dpto_produto,qtd_itens,valor,custo_mercadoria_vendida
05/01/2024,1001,7001,10,Mercado Sol,3,Ana,501,Cafe 500g,Mercearia,2,\"30,00\",\"18,00\"
20/01/2024,1002,7002,11,Padaria Lua,3,Ana,502,Acucar 1kg,Mercearia,5,\"25,50\",
02/02/2024,1003,7003,10,Mercado Sol,4,Bruno,501,Cafe 500g,Mercearia,1,\"15,00\",\"9,00\"
";

/// Fresh database seeded with `monthly_history(months)`
pub fn seeded_db(months: usize) -> Database {
    let db = Database::in_memory().expect("in-memory database");
    db.insert_sales(&monthly_history(months))
        .expect("seed sales");
    db
}
