//! Sales ingestion, metrics and insight handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, Request, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use saleslens_core::{
    compute_monthly_insights, compute_yearly_insights, DateRange, MonthlyInsight, MonthlyTotals,
    YearlyInsight,
};

use super::{parse_param, parse_range};
use crate::{get_user_email, AppError, AppState, SuccessResponse, MAX_UPLOAD_SIZE};

/// Payload of a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub inserted_rows: usize,
    pub import_id: i64,
}

/// POST /api/sales/upload - Ingest a sales CSV (multipart field `file`)
///
/// An optional `force` field re-imports a file that was already ingested.
pub async fn upload_sales(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse<UploadData>>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut force = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("text/csv") {
                        return Err(AppError::bad_request("Only CSV files are allowed"));
                    }
                }
                filename = field.file_name().map(String::from);

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read file data"))?;

                if bytes.len() > MAX_UPLOAD_SIZE {
                    return Err(AppError::bad_request(&format!(
                        "File too large. Maximum size is {} MB",
                        MAX_UPLOAD_SIZE / 1024 / 1024
                    )));
                }

                file_data = Some(bytes.to_vec());
            }
            "force" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read force"))?;
                force = matches!(value.trim(), "true" | "1" | "yes");
            }
            _ => {}
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::bad_request("No file sent"))?;
    let user_email = get_user_email(&headers);

    let summary =
        state
            .db
            .import_csv(&file_data, filename.as_deref(), Some(&user_email), force)?;

    info!(
        import_id = summary.import_id,
        rows = summary.rows_inserted,
        "CSV upload processed"
    );

    state.db.log_audit(
        &user_email,
        "upload",
        Some("import"),
        Some(summary.import_id),
        Some(&format!(
            "rows={} file={}",
            summary.rows_inserted,
            summary.filename.as_deref().unwrap_or("-")
        )),
    )?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "CSV processed successfully".to_string(),
        data: UploadData {
            inserted_rows: summary.rows_inserted,
            import_id: summary.import_id,
        },
    }))
}

/// Query parameters for a single month
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

/// GET /api/sales/monthly - Totals for one month
pub async fn get_monthly_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
    request: Request,
) -> Result<Json<MonthlyTotals>, AppError> {
    let user_email = get_user_email(request.headers());

    let year: Option<i32> = parse_param("year", params.year.as_deref())?;
    let month: Option<u32> = parse_param("month", params.month.as_deref())?;
    let (Some(year), Some(month)) = (year, month) else {
        return Err(AppError::bad_request("Year and month are required"));
    };

    let totals = state.db.get_month_totals(year, month)?;

    state.db.log_audit(
        &user_email,
        "view",
        Some("monthly_metrics"),
        None,
        Some(&format!("year={} month={}", year, month)),
    )?;

    Ok(Json(totals))
}

/// Optional inclusive date filter
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    fn range(&self) -> Result<DateRange, AppError> {
        parse_range(self.from.as_deref(), self.to.as_deref())
    }
}

/// GET /api/sales/monthly/all - Totals for every month with sales
pub async fn list_monthly_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeQuery>,
    request: Request,
) -> Result<Json<Vec<MonthlyTotals>>, AppError> {
    let user_email = get_user_email(request.headers());
    let range = params.range()?;

    let totals = state.db.fetch_monthly_totals(&range)?;

    state
        .db
        .log_audit(&user_email, "list", Some("monthly_metrics"), None, None)?;

    Ok(Json(totals))
}

/// GET /api/sales/monthly/insights - Monthly insights with growth
pub async fn get_monthly_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeQuery>,
    request: Request,
) -> Result<Json<Vec<MonthlyInsight>>, AppError> {
    let user_email = get_user_email(request.headers());
    let range = params.range()?;

    let totals = state.db.fetch_monthly_totals(&range)?;
    let insights = compute_monthly_insights(&totals);

    state
        .db
        .log_audit(&user_email, "view", Some("monthly_insights"), None, None)?;

    Ok(Json(insights))
}

/// GET /api/sales/yearly/insights - Yearly roll-up of the monthly insights
pub async fn get_yearly_insights(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<YearlyInsight>>, AppError> {
    let user_email = get_user_email(request.headers());

    let totals = state.db.fetch_monthly_totals(&DateRange::all())?;
    let yearly = compute_yearly_insights(&compute_monthly_insights(&totals));

    state
        .db
        .log_audit(&user_email, "view", Some("yearly_insights"), None, None)?;

    Ok(Json(yearly))
}
