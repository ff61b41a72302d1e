//! Forecasting engine
//!
//! Projects a monthly series forward with three independent methods:
//! - Linear regression over the month index
//! - A self-feeding moving average
//! - Holt-Winters with multiplicative seasonality
//!
//! A method without enough history yields no values instead of failing the
//! whole forecast.

pub mod chart;
pub mod engine;
pub mod holt_winters;
pub mod linear;
pub mod moving_average;
pub mod types;

pub use chart::build_chart;
pub use engine::{
    default_season_length, forecast, predict, ForecastEngine, ForecastModel, MAX_HORIZON,
    MIN_HISTORY,
};
pub use holt_winters::{holt_winters, HoltWinters, Smoothing};
pub use linear::{linear_regression, LinearRegression};
pub use moving_average::{moving_average, MovingAverage};
pub use types::*;
