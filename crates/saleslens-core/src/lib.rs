//! SalesLens Core Library
//!
//! Shared functionality for the SalesLens sales analytics tool:
//! - Database access and migrations (SQLCipher-encrypted SQLite)
//! - CSV ingestion of per-item sales exports
//! - Monthly aggregation of sale lines
//! - Monthly and yearly insights
//! - Forecasting with linear regression, moving average and Holt-Winters

pub mod aggregate;
pub mod db;
pub mod error;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod models;

/// Shared fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate_month, aggregate_monthly};
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{
    build_chart, forecast, predict, ForecastMethod, ForecastResult, ForecastSet, Prediction,
    PredictionChart,
};
pub use insights::{compute_monthly_insights, compute_yearly_insights};
pub use models::{
    AuditEntry, DateRange, ImportSession, ImportSummary, Metric, MonthlyInsight, MonthlyTotals,
    NewSale, Sale, YearMonth, YearlyInsight,
};
