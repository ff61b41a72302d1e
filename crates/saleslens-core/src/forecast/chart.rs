//! Row-oriented chart view of a prediction

use super::types::{ChartPoint, ForecastMethod, Prediction, PredictionChart};

/// Label of the row that carries the history size
pub const CURRENT_LABEL: &str = "current";

/// Pivot a [`Prediction`] into one row per future step
///
/// The first row is labelled `current` and only carries the number of
/// historical points. Rows `M+1..=M+periods` follow, each holding the value
/// every method produced for that step. A method with no values leaves its
/// column empty.
pub fn build_chart(prediction: &Prediction) -> PredictionChart {
    let column = |method: ForecastMethod, step: usize| -> Option<f64> {
        prediction
            .forecasts
            .iter()
            .find(|f| f.method == method)
            .and_then(|f| f.values.get(step).copied())
    };

    let mut data = Vec::with_capacity(prediction.periods + 1);
    data.push(ChartPoint {
        label: CURRENT_LABEL.to_string(),
        base: Some(prediction.base_points),
        linear: None,
        moving_average: None,
        holt_winters: None,
    });

    data.extend((0..prediction.periods).map(|i| ChartPoint {
        label: format!("M+{}", i + 1),
        base: None,
        linear: column(ForecastMethod::Linear, i),
        moving_average: column(ForecastMethod::MovingAverage, i),
        holt_winters: column(ForecastMethod::HoltWinters, i),
    }));

    PredictionChart {
        metric: prediction.metric,
        periods: prediction.periods,
        data,
    }
}
