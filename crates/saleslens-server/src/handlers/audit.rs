//! Audit log and import history handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::parse_param;
use crate::{get_user_email, AppError, AppState, MAX_PAGE_LIMIT};
use saleslens_core::{AuditEntry, ImportSession};

/// Entries returned when the request gives no limit
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for paginated lists
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    /// Requested limit, clamped to `1..=MAX_PAGE_LIMIT`
    fn limit(&self) -> Result<i64, AppError> {
        let limit = parse_param::<i64>("limit", self.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);
        Ok(limit.clamp(1, MAX_PAGE_LIMIT))
    }
}

/// GET /api/audit - List audit log entries
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let user_email = get_user_email(request.headers());
    let limit = params.limit()?;

    let entries = state.db.list_audit_log(limit)?;

    // Viewing the audit log is itself audited
    state.db.log_audit(
        &user_email,
        "list",
        Some("audit_log"),
        None,
        Some(&format!("limit={}", limit)),
    )?;

    Ok(Json(entries))
}

/// GET /api/imports - Import history, newest first
pub async fn list_imports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
    request: Request,
) -> Result<Json<Vec<ImportSession>>, AppError> {
    let user_email = get_user_email(request.headers());
    let limit = params.limit()?;

    let sessions = state.db.list_import_sessions(limit)?;

    state
        .db
        .log_audit(&user_email, "list", Some("import_sessions"), None, None)?;

    Ok(Json(sessions))
}
