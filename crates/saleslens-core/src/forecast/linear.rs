//! Linear regression forecaster
//!
//! Ordinary least squares of each value against its 1-based position, then
//! the fitted line extended past the end of the series.

use crate::error::Result;

use super::engine::ForecastModel;
use super::types::ForecastMethod;

/// Least-squares trend line
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

/// Slope and intercept of `value = slope * x + intercept` for `x = 1..=n`
///
/// `None` for fewer than two points, where the line is undefined.
pub fn fit(series: &[f64]) -> Option<(f64, f64)> {
    if series.len() < 2 {
        return None;
    }

    let n = series.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_x2) = series.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2), (i, &y)| {
            let x = (i + 1) as f64;
            (sx + x, sy + y, sxy + x * y, sx2 + x * x)
        },
    );

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

/// Project `periods` steps past the end of `series`
pub fn linear_regression(series: &[f64], periods: usize) -> Vec<f64> {
    let Some((slope, intercept)) = fit(series) else {
        return vec![];
    };
    let n = series.len();

    (1..=periods)
        .map(|k| slope * (n + k) as f64 + intercept)
        .collect()
}

impl ForecastModel for LinearRegression {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Linear
    }

    fn forecast(&self, series: &[f64], periods: usize) -> Result<Vec<f64>> {
        Ok(linear_regression(series, periods))
    }
}
