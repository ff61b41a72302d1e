//! Insight Deriver - business metrics from monthly totals
//!
//! Turns the ascending [`MonthlyTotals`](crate::models::MonthlyTotals)
//! sequence into derived insights:
//!
//! - **Monthly** - ticket size, item cost, gross profit and margin, plus
//!   month-over-month growth against the immediately preceding entry
//! - **Yearly** - the months of each year summed first, ratios recomputed
//!   from the sums, best/worst month, and year-over-year growth
//!
//! Ratios over a zero denominator are `0`. Growth without a strictly positive
//! baseline is `None`, so "no growth" and "nothing to compare" stay distinct.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use saleslens_core::insights::{compute_monthly_insights, compute_yearly_insights};
//!
//! let totals = db.fetch_monthly_totals(&DateRange::all())?;
//! let monthly = compute_monthly_insights(&totals);
//! let yearly = compute_yearly_insights(&monthly);
//! ```

pub mod monthly;
pub mod yearly;

pub use monthly::compute_monthly_insights;
pub use yearly::compute_yearly_insights;

/// `numerator / denominator`, or `0` when the denominator is not positive
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`
///
/// `None` when there is no previous value or it is not strictly positive.
pub(crate) fn growth_pct(current: f64, previous: Option<f64>) -> Option<f64> {
    match previous {
        Some(prev) if prev > 0.0 => Some((current - prev) / prev * 100.0),
        _ => None,
    }
}

/// Average cost per item; `0` unless both items and cost are positive
pub(crate) fn avg_item_cost(total_cost: f64, total_items: f64) -> f64 {
    if total_items > 0.0 && total_cost > 0.0 {
        total_cost / total_items
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(10.0, 0.0), 0.0);
        assert_eq!(ratio(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_growth_requires_positive_base() {
        assert_eq!(growth_pct(150.0, Some(100.0)), Some(50.0));
        assert_eq!(growth_pct(50.0, Some(100.0)), Some(-50.0));
        assert_eq!(growth_pct(100.0, Some(100.0)), Some(0.0));
        assert_eq!(growth_pct(100.0, Some(0.0)), None);
        assert_eq!(growth_pct(100.0, None), None);
    }

    #[test]
    fn test_avg_item_cost_needs_cost() {
        assert_eq!(avg_item_cost(0.0, 10.0), 0.0);
        assert_eq!(avg_item_cost(20.0, 0.0), 0.0);
        assert_eq!(avg_item_cost(20.0, 10.0), 2.0);
    }
}
