//! Domain models for saleslens

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A stored sale line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    #[serde(flatten)]
    pub record: NewSale,
}

/// A validated sale line ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub date: NaiveDate,
    pub invoice_number: i64,
    pub transaction_number: i64,
    pub customer_code: i64,
    pub customer_name: String,
    pub rep_code: i64,
    pub rep_name: String,
    pub product_code: i64,
    pub product_name: String,
    pub department: Option<String>,
    pub quantity: f64,
    /// Monetary value of the line
    pub value: f64,
    /// Cost of goods sold, when the export carries it
    pub cost: Option<f64>,
}

impl NewSale {
    /// Minimal record for a date, quantity, value and optional cost
    ///
    /// Identity fields are zeroed; used by fixtures and in-memory aggregation.
    pub fn simple(date: NaiveDate, quantity: f64, value: f64, cost: Option<f64>) -> Self {
        Self {
            date,
            invoice_number: 0,
            transaction_number: 0,
            customer_code: 0,
            customer_name: String::new(),
            rep_code: 0,
            rep_name: String::new(),
            product_code: 0,
            product_name: String::new(),
            department: None,
            quantity,
            value,
            cost,
        }
    }
}

/// A calendar month, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid(format!(
                "Invalid month: {} (expected 1-12)",
                month
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::invalid(format!("Invalid year: {}", year)));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in new()/of()
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive date filter for aggregation; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(Error::invalid(format!(
                    "Invalid date range: {} is after {}",
                    f, t
                )));
            }
        }
        Ok(Self { from, to })
    }

    /// No filter: every month with sales
    pub fn all() -> Self {
        Self::default()
    }

    /// Exactly one calendar month
    pub fn month(ym: YearMonth) -> Self {
        Self {
            from: Some(ym.first_day()),
            to: Some(ym.last_day()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

/// Raw totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    /// Number of sale lines
    pub total_sales: i64,
    pub total_items: f64,
    pub total_value: f64,
    pub total_cost: f64,
}

impl MonthlyTotals {
    pub fn empty(ym: YearMonth) -> Self {
        Self {
            year: ym.year,
            month: ym.month,
            total_sales: 0,
            total_items: 0.0,
            total_value: 0.0,
            total_cost: 0.0,
        }
    }

    pub fn year_month(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

/// Monthly totals with derived ratios and month-over-month growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInsight {
    #[serde(flatten)]
    pub totals: MonthlyTotals,
    pub avg_ticket: f64,
    pub avg_item_cost: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: f64,
    /// Absent when there is no previous month with a positive value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mom_growth_value_pct: Option<f64>,
    /// Absent when there is no previous month with a positive sale count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mom_growth_sales_pct: Option<f64>,
}

/// One calendar year rolled up from its months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyInsight {
    pub year: i32,
    pub total_sales: i64,
    pub total_items: f64,
    pub total_value: f64,
    pub total_cost: f64,
    pub avg_ticket: f64,
    pub avg_item_cost: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: f64,
    /// Month number with the highest total value
    pub best_month: u32,
    /// Month number with the lowest total value
    pub worst_month: u32,
    /// Growth against the previous year; absent for the first year or a zero base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_growth_pct: Option<f64>,
}

/// Metric that can be projected by the forecasting engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    #[default]
    TotalValue,
    TotalSales,
    TotalItems,
    TotalCost,
    GrossProfit,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalValue => "totalValue",
            Self::TotalSales => "totalSales",
            Self::TotalItems => "totalItems",
            Self::TotalCost => "totalCost",
            Self::GrossProfit => "grossProfit",
        }
    }

    /// Read this metric from a monthly insight
    pub fn value_of(&self, insight: &MonthlyInsight) -> f64 {
        match self {
            Self::TotalValue => insight.totals.total_value,
            Self::TotalSales => insight.totals.total_sales as f64,
            Self::TotalItems => insight.totals.total_items,
            Self::TotalCost => insight.totals.total_cost,
            Self::GrossProfit => insight.gross_profit,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "totalValue" => Ok(Self::TotalValue),
            "totalSales" => Ok(Self::TotalSales),
            "totalItems" => Ok(Self::TotalItems),
            "totalCost" => Ok(Self::TotalCost),
            "grossProfit" => Ok(Self::GrossProfit),
            _ => Err(format!(
                "Unknown metric: {} (valid: totalValue, totalSales, totalItems, totalCost, grossProfit)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub id: i64,
    pub filename: Option<String>,
    pub file_hash: String,
    pub rows_inserted: i64,
    pub imported_at: String,
}

/// Result of ingesting one CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub import_id: i64,
    pub filename: Option<String>,
    pub rows_inserted: usize,
    pub file_hash: String,
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub user_email: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!(matches!(
            YearMonth::new(2024, 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            YearMonth::new(2024, 13),
            Err(Error::InvalidInput(_))
        ));
        assert!(YearMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn test_year_month_bounds() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(dec.to_string(), "2023-12");
    }

    #[test]
    fn test_date_range_validation() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(DateRange::new(Some(jan), Some(feb)).is_ok());
        assert!(DateRange::new(Some(feb), Some(jan)).is_err());

        let range = DateRange::new(Some(jan), None).unwrap();
        assert!(range.contains(feb));
        assert!(!range.contains(jan.pred_opt().unwrap()));
        assert!(DateRange::all().contains(NaiveDate::MIN));
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("totalValue".parse::<Metric>().unwrap(), Metric::TotalValue);
        assert_eq!("totalSales".parse::<Metric>().unwrap(), Metric::TotalSales);
        assert!("revenue".parse::<Metric>().is_err());
        assert_eq!(Metric::default(), Metric::TotalValue);
    }

    #[test]
    fn test_growth_fields_omitted_when_absent() {
        let insight = MonthlyInsight {
            totals: MonthlyTotals::empty(YearMonth::new(2024, 1).unwrap()),
            avg_ticket: 0.0,
            avg_item_cost: 0.0,
            gross_profit: 0.0,
            gross_margin_pct: 0.0,
            mom_growth_value_pct: None,
            mom_growth_sales_pct: Some(0.0),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert!(json.get("momGrowthValuePct").is_none());
        assert_eq!(json["momGrowthSalesPct"], 0.0);
        assert_eq!(json["totalSales"], 0);
        assert_eq!(json["month"], 1);
    }
}
