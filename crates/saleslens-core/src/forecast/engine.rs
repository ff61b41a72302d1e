//! Forecast engine - validates input and runs every registered model

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Metric, MonthlyInsight};

use super::holt_winters::HoltWinters;
use super::linear::LinearRegression;
use super::moving_average::MovingAverage;
use super::types::{ForecastMethod, ForecastSet, Prediction};

/// Minimum number of historical points accepted
pub const MIN_HISTORY: usize = 3;

/// Maximum forecast horizon
pub const MAX_HORIZON: usize = 24;

/// Trait for forecasting models
///
/// Models are pure: the same series and horizon always give the same values.
/// A model that cannot work with the series it is given returns an empty
/// vector rather than an error.
pub trait ForecastModel: Send + Sync {
    /// Which method this model implements
    fn method(&self) -> ForecastMethod;

    /// Project `periods` steps past the end of `series`
    fn forecast(&self, series: &[f64], periods: usize) -> Result<Vec<f64>>;
}

/// Season length for a history of `n` points: a year when available,
/// otherwise half the history (at least 2)
pub fn default_season_length(n: usize) -> usize {
    if n >= 12 {
        12
    } else {
        (n / 2).max(2)
    }
}

/// Runs the linear, moving-average and Holt-Winters models side by side
pub struct ForecastEngine {
    models: Vec<Box<dyn ForecastModel>>,
}

impl ForecastEngine {
    /// Engine with the built-in models for the given season length
    pub fn new(season_length: usize) -> Self {
        let mut engine = Self { models: vec![] };

        engine.register(Box::new(LinearRegression));
        engine.register(Box::new(MovingAverage::default()));
        engine.register(Box::new(HoltWinters::new(season_length)));

        engine
    }

    /// Register a forecasting model, replacing any model for the same method
    pub fn register(&mut self, model: Box<dyn ForecastModel>) {
        self.models.retain(|m| m.method() != model.method());
        self.models.push(model);
    }

    /// Methods this engine runs
    pub fn methods(&self) -> Vec<ForecastMethod> {
        self.models.iter().map(|m| m.method()).collect()
    }

    /// Validate the request, then run every model on the same series
    pub fn run(&self, series: &[f64], periods: usize) -> Result<ForecastSet> {
        validate_horizon(periods)?;
        validate_series(series)?;

        let mut set = ForecastSet::default();
        for model in &self.models {
            let values = model.forecast(series, periods)?;
            if values.is_empty() {
                warn!(
                    method = model.method().as_str(),
                    points = series.len(),
                    "Not enough history for method; returning no values"
                );
            } else {
                debug!(
                    method = model.method().as_str(),
                    count = values.len(),
                    "Forecast complete"
                );
            }
            set.set(model.method(), values);
        }

        Ok(set)
    }
}

/// Reject horizons outside `1..=24`
pub fn validate_horizon(periods: usize) -> Result<()> {
    if !(1..=MAX_HORIZON).contains(&periods) {
        return Err(Error::InvalidInput(format!(
            "Invalid prediction horizon: {} (expected 1-{})",
            periods, MAX_HORIZON
        )));
    }
    Ok(())
}

fn validate_series(series: &[f64]) -> Result<()> {
    if series.len() < MIN_HISTORY {
        return Err(Error::InvalidInput(format!(
            "Not enough historical data: {} points (need at least {})",
            series.len(),
            MIN_HISTORY
        )));
    }
    if let Some(pos) = series.iter().position(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "Series value at point {} is not a finite number",
            pos + 1
        )));
    }
    Ok(())
}

/// Forecast `series` `horizon` steps ahead with all three methods
///
/// `season_length` defaults to [`default_season_length`] of the series.
pub fn forecast(series: &[f64], horizon: usize, season_length: Option<usize>) -> Result<ForecastSet> {
    validate_horizon(horizon)?;
    validate_series(series)?;

    let season_length = match season_length {
        Some(l) if l < 2 => {
            return Err(Error::InvalidInput(format!(
                "Invalid season length: {} (must be at least 2)",
                l
            )))
        }
        Some(l) => l,
        None => default_season_length(series.len()),
    };

    ForecastEngine::new(season_length).run(series, horizon)
}

/// Forecast one metric from the monthly insight history
pub fn predict(insights: &[MonthlyInsight], metric: Metric, periods: usize) -> Result<Prediction> {
    // Horizon is checked before looking at the history
    validate_horizon(periods)?;

    let series: Vec<f64> = insights.iter().map(|m| metric.value_of(m)).collect();
    let set = forecast(&series, periods, None)?;

    Ok(Prediction {
        metric,
        periods,
        base_points: series.len(),
        forecasts: set.into_results(metric, periods),
    })
}
