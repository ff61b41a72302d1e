//! Monthly insights

use tracing::{debug, warn};

use crate::models::{MonthlyInsight, MonthlyTotals};

use super::{avg_item_cost, growth_pct, ratio};

/// Derive one insight per month, preserving order
///
/// `totals` must be ascending by (year, month) without duplicates; growth is
/// measured against the previous entry in the slice.
pub fn compute_monthly_insights(totals: &[MonthlyTotals]) -> Vec<MonthlyInsight> {
    if !totals
        .windows(2)
        .all(|w| w[0].year_month() < w[1].year_month())
    {
        warn!("Monthly totals are not strictly ascending; growth figures compare adjacent entries");
    }

    let insights: Vec<MonthlyInsight> = totals
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let prev = i.checked_sub(1).map(|p| &totals[p]);
            derive(current, prev)
        })
        .collect();

    debug!(months = insights.len(), "Computed monthly insights");
    insights
}

fn derive(current: &MonthlyTotals, prev: Option<&MonthlyTotals>) -> MonthlyInsight {
    let gross_profit = current.total_value - current.total_cost;

    MonthlyInsight {
        totals: current.clone(),
        avg_ticket: ratio(current.total_value, current.total_sales as f64),
        avg_item_cost: avg_item_cost(current.total_cost, current.total_items),
        gross_profit,
        gross_margin_pct: ratio(gross_profit, current.total_value) * 100.0,
        mom_growth_value_pct: growth_pct(current.total_value, prev.map(|p| p.total_value)),
        mom_growth_sales_pct: growth_pct(
            current.total_sales as f64,
            prev.map(|p| p.total_sales as f64),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_length_and_order_preserved() {
        let input = vec![
            totals(2023, 11, 2, 4.0, 100.0, 40.0),
            totals(2023, 12, 3, 6.0, 150.0, 60.0),
            totals(2024, 1, 1, 1.0, 50.0, 0.0),
        ];
        let out = compute_monthly_insights(&input);
        assert_eq!(out.len(), input.len());
        for (insight, t) in out.iter().zip(&input) {
            assert_eq!(&insight.totals, t);
        }
    }

    #[test]
    fn test_derived_ratios() {
        let out = compute_monthly_insights(&[totals(2024, 1, 4, 10.0, 200.0, 50.0)]);
        let m = &out[0];
        assert_eq!(m.avg_ticket, 50.0);
        assert_eq!(m.avg_item_cost, 5.0);
        assert_eq!(m.gross_profit, 150.0);
        assert_eq!(m.gross_margin_pct, 75.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let out = compute_monthly_insights(&[totals(2024, 1, 0, 0.0, 0.0, 0.0)]);
        let m = &out[0];
        assert_eq!(m.avg_ticket, 0.0);
        assert_eq!(m.avg_item_cost, 0.0);
        assert_eq!(m.gross_margin_pct, 0.0);

        // Items sold but no recorded cost
        let out = compute_monthly_insights(&[totals(2024, 1, 2, 5.0, 80.0, 0.0)]);
        assert_eq!(out[0].avg_item_cost, 0.0);
        assert_eq!(out[0].gross_margin_pct, 100.0);
    }

    #[test]
    fn test_mom_growth() {
        let input = vec![
            totals(2024, 1, 4, 4.0, 100.0, 0.0),
            totals(2024, 2, 5, 5.0, 125.0, 0.0),
            totals(2024, 3, 0, 0.0, 0.0, 0.0),
            totals(2024, 4, 2, 2.0, 40.0, 0.0),
        ];
        let out = compute_monthly_insights(&input);

        assert_eq!(out[0].mom_growth_value_pct, None);
        assert_eq!(out[0].mom_growth_sales_pct, None);

        assert_eq!(out[1].mom_growth_value_pct, Some(25.0));
        assert_eq!(out[1].mom_growth_sales_pct, Some(25.0));

        assert_eq!(out[2].mom_growth_value_pct, Some(-100.0));

        // Predecessor has zero value and zero sales: no baseline
        assert_eq!(out[3].mom_growth_value_pct, None);
        assert_eq!(out[3].mom_growth_sales_pct, None);
    }

    #[test]
    fn test_mom_growth_exact_formula() {
        let input = vec![
            totals(2024, 1, 3, 3.0, 300.0, 0.0),
            totals(2024, 2, 7, 3.0, 410.0, 0.0),
        ];
        let out = compute_monthly_insights(&input);
        assert_eq!(out[1].mom_growth_value_pct, Some((410.0 - 300.0) / 300.0 * 100.0));
        assert_eq!(out[1].mom_growth_sales_pct, Some((7.0 - 3.0) / 3.0 * 100.0));
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            totals(2024, 1, 3, 3.0, 300.0, 10.0),
            totals(2024, 2, 7, 3.0, 410.0, 20.0),
        ];
        assert_eq!(compute_monthly_insights(&input), compute_monthly_insights(&input));
    }
}
