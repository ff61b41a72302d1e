//! Forecast handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use saleslens_core::{
    build_chart, compute_monthly_insights, predict, DateRange, Metric, Prediction,
    PredictionChart,
};

use super::parse_param;
use crate::{get_user_email, AppError, AppState};

/// Horizon used when the request gives none
const DEFAULT_PERIODS: usize = 3;

/// Query parameters for GET /api/prediction
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub metric: Option<String>,
    pub months: Option<String>,
}

/// Query parameters for GET /api/prediction/chart
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub metric: Option<String>,
    pub periods: Option<String>,
}

fn parse_metric(value: Option<&str>) -> Result<Metric, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Metric::default()),
        Some(v) => v.parse().map_err(|e: String| AppError::bad_request(&e)),
    }
}

/// Forecast `metric` over the full monthly history
fn run_prediction(state: &AppState, metric: Metric, periods: usize) -> Result<Prediction, AppError> {
    let totals = state.db.fetch_monthly_totals(&DateRange::all())?;
    let insights = compute_monthly_insights(&totals);
    Ok(predict(&insights, metric, periods)?)
}

/// GET /api/prediction - Forecast a metric with all three methods
pub async fn get_prediction(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictionQuery>,
    request: Request,
) -> Result<Json<Prediction>, AppError> {
    let user_email = get_user_email(request.headers());
    let metric = parse_metric(params.metric.as_deref())?;
    let periods =
        parse_param::<usize>("months", params.months.as_deref())?.unwrap_or(DEFAULT_PERIODS);

    let prediction = run_prediction(&state, metric, periods)?;

    state.db.log_audit(
        &user_email,
        "view",
        Some("prediction"),
        None,
        Some(&format!("metric={} months={}", metric, periods)),
    )?;

    Ok(Json(prediction))
}

/// GET /api/prediction/chart - Forecast pivoted into chart rows
pub async fn get_prediction_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartQuery>,
    request: Request,
) -> Result<Json<PredictionChart>, AppError> {
    let user_email = get_user_email(request.headers());
    let metric = parse_metric(params.metric.as_deref())?;
    let periods =
        parse_param::<usize>("periods", params.periods.as_deref())?.unwrap_or(DEFAULT_PERIODS);

    let prediction = run_prediction(&state, metric, periods)?;
    let chart = build_chart(&prediction);

    state.db.log_audit(
        &user_email,
        "view",
        Some("prediction_chart"),
        None,
        Some(&format!("metric={} periods={}", metric, periods)),
    )?;

    Ok(Json(chart))
}
