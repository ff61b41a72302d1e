//! Forecast result types

use serde::{Deserialize, Serialize};

use crate::models::Metric;

/// Forecasting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForecastMethod {
    Linear,
    MovingAverage,
    HoltWinters,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::MovingAverage => "movingAverage",
            Self::HoltWinters => "holtWinters",
        }
    }

    pub fn all() -> [ForecastMethod; 3] {
        [Self::Linear, Self::MovingAverage, Self::HoltWinters]
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Projection of one metric by one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub method: ForecastMethod,
    pub metric: Metric,
    /// Requested horizon
    pub periods: usize,
    /// `periods` values, or none when the method lacks enough history
    pub values: Vec<f64>,
}

/// The three projections of a series, side by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSet {
    pub linear: Vec<f64>,
    pub moving_average: Vec<f64>,
    pub holt_winters: Vec<f64>,
}

impl ForecastSet {
    pub fn values(&self, method: ForecastMethod) -> &[f64] {
        match method {
            ForecastMethod::Linear => &self.linear,
            ForecastMethod::MovingAverage => &self.moving_average,
            ForecastMethod::HoltWinters => &self.holt_winters,
        }
    }

    pub(crate) fn set(&mut self, method: ForecastMethod, values: Vec<f64>) {
        match method {
            ForecastMethod::Linear => self.linear = values,
            ForecastMethod::MovingAverage => self.moving_average = values,
            ForecastMethod::HoltWinters => self.holt_winters = values,
        }
    }

    /// One [`ForecastResult`] per method, in fixed method order
    pub fn into_results(self, metric: Metric, periods: usize) -> Vec<ForecastResult> {
        ForecastMethod::all()
            .into_iter()
            .map(|method| ForecastResult {
                method,
                metric,
                periods,
                values: self.values(method).to_vec(),
            })
            .collect()
    }
}

/// Forecast of a metric drawn from the monthly history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub metric: Metric,
    pub periods: usize,
    /// Number of historical months used
    pub base_points: usize,
    pub forecasts: Vec<ForecastResult>,
}

/// One row of the chart view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holt_winters: Option<f64>,
}

/// Row-oriented forecast for chart consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionChart {
    pub metric: Metric,
    pub periods: usize,
    pub data: Vec<ChartPoint>,
}
