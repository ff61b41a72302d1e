//! Yearly insights

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{MonthlyInsight, YearlyInsight};

use super::{growth_pct, ratio};

/// Roll monthly insights up into one entry per year, ascending by year
///
/// Raw totals are summed first and every ratio is recomputed from the sums;
/// monthly ratios are never averaged.
pub fn compute_yearly_insights(insights: &[MonthlyInsight]) -> Vec<YearlyInsight> {
    let mut by_year: BTreeMap<i32, Vec<&MonthlyInsight>> = BTreeMap::new();
    for m in insights {
        by_year.entry(m.totals.year).or_default().push(m);
    }

    let mut yearly: Vec<YearlyInsight> = by_year
        .into_iter()
        .filter_map(|(year, months)| roll_up(year, &months))
        .collect();

    // Each year compares against the one before it in the sorted sequence
    let previous_values: Vec<Option<f64>> = std::iter::once(None)
        .chain(yearly.iter().map(|y| Some(y.total_value)))
        .collect();
    for (year, prev) in yearly.iter_mut().zip(previous_values) {
        year.value_growth_pct = growth_pct(year.total_value, prev);
    }

    debug!(years = yearly.len(), "Computed yearly insights");
    yearly
}

fn roll_up(year: i32, months: &[&MonthlyInsight]) -> Option<YearlyInsight> {
    let total_sales: i64 = months.iter().map(|m| m.totals.total_sales).sum();
    let total_items: f64 = months.iter().map(|m| m.totals.total_items).sum();
    let total_value: f64 = months.iter().map(|m| m.totals.total_value).sum();
    let total_cost: f64 = months.iter().map(|m| m.totals.total_cost).sum();
    let gross_profit = total_value - total_cost;

    // Stable sort: ties keep chronological order
    let mut ranked: Vec<&MonthlyInsight> = months.to_vec();
    ranked.sort_by(|a, b| {
        b.totals
            .total_value
            .partial_cmp(&a.totals.total_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let best_month = ranked.first()?.totals.month;
    let worst_month = ranked.last()?.totals.month;

    Some(YearlyInsight {
        year,
        total_sales,
        total_items,
        total_value,
        total_cost,
        avg_ticket: ratio(total_value, total_sales as f64),
        // Net negative cost keeps its sign
        avg_item_cost: ratio(total_cost, total_items),
        gross_profit,
        gross_margin_pct: ratio(gross_profit, total_value) * 100.0,
        best_month,
        worst_month,
        value_growth_pct: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::compute_monthly_insights;
    use crate::models::MonthlyTotals;

    fn totals(year: i32, month: u32, sales: i64, items: f64, value: f64, cost: f64) -> MonthlyTotals {
        MonthlyTotals {
            year,
            month,
            total_sales: sales,
            total_items: items,
            total_value: value,
            total_cost: cost,
        }
    }

    #[test]
    fn test_sums_then_ratios() {
        // Month ratios: ticket 10 and 100; a naive average would give 55
        let monthly = compute_monthly_insights(&[
            totals(2024, 1, 9, 9.0, 90.0, 45.0),
            totals(2024, 2, 1, 1.0, 100.0, 10.0),
        ]);
        let yearly = compute_yearly_insights(&monthly);
        assert_eq!(yearly.len(), 1);

        let y = &yearly[0];
        assert_eq!(y.total_sales, 10);
        assert_eq!(y.total_items, 10.0);
        assert_eq!(y.total_value, 190.0);
        assert_eq!(y.total_cost, 55.0);
        assert_eq!(y.avg_ticket, 19.0);
        assert_eq!(y.avg_item_cost, 5.5);
        assert_eq!(y.gross_profit, 135.0);
        assert_eq!(y.gross_margin_pct, 135.0 / 190.0 * 100.0);
        assert_eq!(y.value_growth_pct, None);
    }

    #[test]
    fn test_best_and_worst_month() {
        let monthly = compute_monthly_insights(&[
            totals(2024, 1, 1, 1.0, 50.0, 0.0),
            totals(2024, 2, 1, 1.0, 200.0, 0.0),
            totals(2024, 3, 1, 1.0, 10.0, 0.0),
            totals(2024, 4, 1, 1.0, 120.0, 0.0),
        ]);
        let y = &compute_yearly_insights(&monthly)[0];
        assert_eq!(y.best_month, 2);
        assert_eq!(y.worst_month, 3);
    }

    #[test]
    fn test_ties_follow_stable_order() {
        let monthly = compute_monthly_insights(&[
            totals(2024, 5, 1, 1.0, 100.0, 0.0),
            totals(2024, 6, 1, 1.0, 100.0, 0.0),
            totals(2024, 7, 1, 1.0, 100.0, 0.0),
        ]);
        let y = &compute_yearly_insights(&monthly)[0];
        assert_eq!(y.best_month, 5);
        assert_eq!(y.worst_month, 7);
    }

    #[test]
    fn test_single_month_year() {
        let monthly = compute_monthly_insights(&[totals(2022, 9, 1, 1.0, 10.0, 0.0)]);
        let y = &compute_yearly_insights(&monthly)[0];
        assert_eq!(y.best_month, 9);
        assert_eq!(y.worst_month, 9);
    }

    #[test]
    fn test_year_over_year_growth() {
        let monthly = compute_monthly_insights(&[
            totals(2022, 12, 1, 1.0, 0.0, 0.0),
            totals(2023, 1, 1, 1.0, 100.0, 0.0),
            totals(2023, 2, 1, 1.0, 100.0, 0.0),
            totals(2024, 1, 1, 1.0, 300.0, 0.0),
        ]);
        let yearly = compute_yearly_insights(&monthly);
        let years: Vec<i32> = yearly.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);

        assert_eq!(yearly[0].value_growth_pct, None);
        // 2022 had zero value: no baseline
        assert_eq!(yearly[1].value_growth_pct, None);
        assert_eq!(yearly[2].value_growth_pct, Some(50.0));
    }

    #[test]
    fn test_years_sorted_regardless_of_input_order() {
        let mut monthly = compute_monthly_insights(&[
            totals(2023, 1, 1, 1.0, 100.0, 0.0),
            totals(2024, 1, 1, 1.0, 200.0, 0.0),
        ]);
        monthly.reverse();
        let yearly = compute_yearly_insights(&monthly);
        assert_eq!(yearly[0].year, 2023);
        assert_eq!(yearly[1].year, 2024);
        assert_eq!(yearly[1].value_growth_pct, Some(100.0));
    }

    #[test]
    fn test_avg_item_cost_keeps_negative_cost() {
        // Credit notes outweigh the year's recorded cost
        let monthly = compute_monthly_insights(&[
            totals(2024, 1, 2, 4.0, 40.0, 10.0),
            totals(2024, 2, 1, 6.0, -5.0, -30.0),
        ]);
        let yearly = compute_yearly_insights(&monthly);
        assert_eq!(yearly[0].total_cost, -20.0);
        assert_eq!(yearly[0].avg_item_cost, -2.0);

        // No items: no ratio
        let monthly = compute_monthly_insights(&[totals(2025, 1, 0, 0.0, 0.0, 5.0)]);
        assert_eq!(compute_yearly_insights(&monthly)[0].avg_item_cost, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_yearly_insights(&[]).is_empty());
    }
}
