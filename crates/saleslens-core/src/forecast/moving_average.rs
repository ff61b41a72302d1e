//! Recursive moving-average forecaster
//!
//! Each step is the mean of the last `window` values, where forecasts already
//! produced count as values. Later steps therefore smooth earlier forecasts
//! rather than only the observed history.

use crate::error::Result;

use super::engine::ForecastModel;
use super::types::ForecastMethod;

/// Window used by the engine
pub const DEFAULT_WINDOW: usize = 3;

/// Self-feeding moving average over a fixed window
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Project `periods` steps; empty when `series` is shorter than `window`
pub fn moving_average(series: &[f64], window: usize, periods: usize) -> Vec<f64> {
    if window == 0 || series.len() < window {
        return vec![];
    }

    // Only the trailing window is ever read
    let seed = series[series.len() - window..].to_vec();

    let (_, forecasts) = (0..periods).fold(
        (seed, Vec::with_capacity(periods)),
        |(mut buffer, mut out), _| {
            let tail = &buffer[buffer.len() - window..];
            let avg = tail.iter().sum::<f64>() / window as f64;
            out.push(avg);
            buffer.push(avg);
            (buffer, out)
        },
    );

    forecasts
}

impl ForecastModel for MovingAverage {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::MovingAverage
    }

    fn forecast(&self, series: &[f64], periods: usize) -> Result<Vec<f64>> {
        Ok(moving_average(series, self.window, periods))
    }
}
