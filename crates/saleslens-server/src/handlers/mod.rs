//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod prediction;
pub mod sales;

// Re-export all handlers for use in router
pub use audit::*;
pub use prediction::*;
pub use sales::*;

use chrono::NaiveDate;
use saleslens_core::DateRange;

use crate::AppError;

/// Parse an optional query parameter; blank counts as absent
pub(crate) fn parse_param<T: std::str::FromStr>(
    name: &str,
    value: Option<&str>,
) -> Result<Option<T>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(&format!("Invalid {}: {}", name, v))),
    }
}

/// Build a date range from optional `from`/`to` (YYYY-MM-DD) parameters
pub(crate) fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, AppError> {
    let parse = |name: &str, value: Option<&str>| -> Result<Option<NaiveDate>, AppError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    AppError::bad_request(&format!("Invalid {} date: {} (expected YYYY-MM-DD)", name, v))
                }),
        }
    };

    Ok(DateRange::new(parse("from", from)?, parse("to", to)?)?)
}
