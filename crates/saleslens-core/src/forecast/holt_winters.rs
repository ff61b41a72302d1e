//! Holt-Winters triple exponential smoothing
//!
//! Additive trend with multiplicative seasonality. The seasonal indices start
//! as the first season's values divided by the first value, are smoothed
//! while walking the whole history, and the final indices drive the
//! projection. The level/trend/seasonal state lives in a local accumulator
//! that never leaves [`holt_winters`].

use tracing::debug;

use crate::error::{Error, Result};

use super::engine::ForecastModel;
use super::types::ForecastMethod;

/// Level smoothing
pub const ALPHA: f64 = 0.3;
/// Trend smoothing
pub const BETA: f64 = 0.1;
/// Seasonal smoothing
pub const GAMMA: f64 = 0.2;

/// Smoothing constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            alpha: ALPHA,
            beta: BETA,
            gamma: GAMMA,
        }
    }
}

/// Seasonal forecaster for a given season length
#[derive(Debug, Clone, Copy)]
pub struct HoltWinters {
    season_length: usize,
    smoothing: Smoothing,
}

impl HoltWinters {
    pub fn new(season_length: usize) -> Self {
        Self {
            season_length,
            smoothing: Smoothing::default(),
        }
    }

    pub fn with_smoothing(season_length: usize, smoothing: Smoothing) -> Self {
        Self {
            season_length,
            smoothing,
        }
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }
}

/// State after consuming the history
#[derive(Debug, Clone)]
struct Components {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
}

/// Project `periods` steps past the end of `series`
///
/// Returns an empty vector when `series` holds fewer than two full seasons,
/// or when a later point of the first season is zero (its seasonal index
/// would be zero and later divide an observation). A zero leading point is
/// rejected: every initial index divides by it.
pub fn holt_winters(
    series: &[f64],
    season_length: usize,
    smoothing: Smoothing,
    periods: usize,
) -> Result<Vec<f64>> {
    if season_length == 0 || series.len() < season_length * 2 {
        return Ok(vec![]);
    }

    if series[0] == 0.0 {
        return Err(Error::InvalidInput(
            "Holt-Winters needs a non-zero leading data point".to_string(),
        ));
    }

    if let Some(pos) = series[1..season_length].iter().position(|v| *v == 0.0) {
        debug!(point = pos + 2, "Zero inside the first season; skipping Holt-Winters");
        return Ok(vec![]);
    }

    let Smoothing { alpha, beta, gamma } = smoothing;
    let initial_level = series[0];
    let initial = Components {
        level: initial_level,
        trend: series[1] - series[0],
        seasonals: series[..season_length]
            .iter()
            .map(|v| v / initial_level)
            .collect(),
    };

    let fitted = series
        .iter()
        .enumerate()
        .fold(initial, |mut state, (t, &value)| {
            let idx = t % season_length;
            let seasonal = state.seasonals[idx];
            let prev_level = state.level;

            state.level = alpha * (value / seasonal) + (1.0 - alpha) * (state.level + state.trend);
            state.trend = beta * (state.level - prev_level) + (1.0 - beta) * state.trend;
            state.seasonals[idx] = gamma * (value / state.level) + (1.0 - gamma) * seasonal;
            state
        });

    debug!(
        level = fitted.level,
        trend = fitted.trend,
        season_length,
        "Holt-Winters fitted"
    );

    let n = series.len();
    Ok((1..=periods)
        .map(|k| {
            (fitted.level + fitted.trend * k as f64)
                * fitted.seasonals[(n + k - 1) % season_length]
        })
        .collect())
}

impl ForecastModel for HoltWinters {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::HoltWinters
    }

    fn forecast(&self, series: &[f64], periods: usize) -> Result<Vec<f64>> {
        holt_winters(series, self.season_length, self.smoothing, periods)
    }
}
