//! Monthly aggregation of sale lines
//!
//! Reduces sale records into one [`MonthlyTotals`] per calendar month that
//! has at least one sale. The output is keyed by (year, month) and ascending,
//! which the insight and forecasting stages rely on for adjacency.
//!
//! The database performs the same reduction in SQL
//! ([`Database::fetch_monthly_totals`](crate::db::Database::fetch_monthly_totals));
//! this module is the in-memory counterpart.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{DateRange, MonthlyTotals, NewSale, YearMonth};

/// Group sales by calendar month within `range`
///
/// Missing cost counts as zero.
pub fn aggregate_monthly(sales: &[NewSale], range: &DateRange) -> Vec<MonthlyTotals> {
    let mut by_month: BTreeMap<YearMonth, MonthlyTotals> = BTreeMap::new();

    for sale in sales.iter().filter(|s| range.contains(s.date)) {
        let ym = YearMonth::of(sale.date);
        let totals = by_month
            .entry(ym)
            .or_insert_with(|| MonthlyTotals::empty(ym));

        totals.total_sales += 1;
        totals.total_items += sale.quantity;
        totals.total_value += sale.value;
        totals.total_cost += sale.cost.unwrap_or(0.0);
    }

    debug!(
        sales = sales.len(),
        months = by_month.len(),
        "Aggregated sales by month"
    );

    by_month.into_values().collect()
}

/// Totals for a single month; zeros when the month has no sales
pub fn aggregate_month(sales: &[NewSale], ym: YearMonth) -> MonthlyTotals {
    aggregate_monthly(sales, &DateRange::month(ym))
        .into_iter()
        .next()
        .unwrap_or_else(|| MonthlyTotals::empty(ym))
}
