//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use saleslens_core::db::Database;
use saleslens_core::test_utils::{seeded_db, SAMPLE_CSV};
use tower::ServiceExt;

const BOUNDARY: &str = "saleslens-test-boundary";

fn open_config() -> ServerConfig {
    ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        ..Default::default()
    }
}

fn setup_test_app() -> Router {
    create_router(Database::in_memory().unwrap(), open_config())
}

fn setup_seeded_app(months: usize) -> (Router, Database) {
    let db = seeded_db(months);
    (create_router(db.clone(), open_config()), db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn multipart_body(content_type: &str, content: &str, force: bool) -> String {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"vendas.csv\"\r\nContent-Type: {ct}\r\n\r\n{content}\r\n",
        b = BOUNDARY,
        ct = content_type,
        content = content,
    );
    if force {
        body.push_str(&format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"force\"\r\n\r\ntrue\r\n",
            b = BOUNDARY
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

async fn upload(app: Router, body: String) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/sales/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

// ========== Upload Tests ==========

#[tokio::test]
async fn test_upload_csv() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), open_config());

    let response = upload(app, multipart_body("text/csv", SAMPLE_CSV, false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "CSV processed successfully");
    assert_eq!(json["data"]["insertedRows"], 3);
    assert!(json["data"]["importId"].as_i64().unwrap() > 0);

    assert_eq!(db.count_sales().unwrap(), 3);
    let audit = db.list_audit_log(10).unwrap();
    assert_eq!(audit[0].action, "upload");
    assert_eq!(audit[0].user_email, "local-dev");
}

#[tokio::test]
async fn test_upload_duplicate_is_conflict() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), open_config());

    let first = upload(app.clone(), multipart_body("text/csv", SAMPLE_CSV, false)).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = upload(app.clone(), multipart_body("text/csv", SAMPLE_CSV, false)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = get_body_json(second).await;
    assert!(json["error"].as_str().unwrap().contains("already imported"));

    let forced = upload(app, multipart_body("text/csv", SAMPLE_CSV, true)).await;
    assert_eq!(forced.status(), StatusCode::OK);
    assert_eq!(db.count_sales().unwrap(), 6);
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let app = setup_test_app();
    let response = upload(app, multipart_body("application/json", "{}", false)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Only CSV files are allowed");
}

#[tokio::test]
async fn test_upload_bad_row_reports_row_number() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), open_config());
    let csv = format!("{}05/03/2024,1,2,3,,4,,5,,,1,,\n", SAMPLE_CSV);

    let response = upload(app, multipart_body("text/csv", &csv, false)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Error on row 5: Missing field valor");
    assert_eq!(db.count_sales().unwrap(), 0);
}

#[tokio::test]
async fn test_upload_without_file() {
    let app = setup_test_app();
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"force\"\r\n\r\ntrue\r\n--{b}--\r\n",
        b = BOUNDARY
    );

    let response = upload(app, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No file sent");
}

// ========== Metrics Tests ==========

#[tokio::test]
async fn test_monthly_metrics() {
    let (app, _db) = setup_seeded_app(3);

    let response = get(app, "/api/sales/monthly?year=2023&month=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["year"], 2023);
    assert_eq!(json["month"], 2);
    assert_eq!(json["totalSales"], 2);
    assert_eq!(json["totalValue"], 160.0);
}

#[tokio::test]
async fn test_monthly_metrics_empty_month_is_zero() {
    let (app, _db) = setup_seeded_app(3);

    let response = get(app, "/api/sales/monthly?year=2031&month=7").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalSales"], 0);
    assert_eq!(json["totalValue"], 0.0);
}

#[tokio::test]
async fn test_monthly_metrics_requires_year_and_month() {
    let app = setup_test_app();

    let response = get(app.clone(), "/api/sales/monthly?year=2024").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Year and month are required");

    let response = get(app.clone(), "/api/sales/monthly?year=2024&month=13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/sales/monthly?year=abc&month=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_monthly_metrics_ordered() {
    let (app, _db) = setup_seeded_app(14);

    let response = get(app, "/api/sales/monthly/all").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let months = json.as_array().unwrap();
    assert_eq!(months.len(), 14);
    assert_eq!(months[0]["year"], 2023);
    assert_eq!(months[0]["month"], 1);
    assert_eq!(months[13]["year"], 2024);
    assert_eq!(months[13]["month"], 2);
}

#[tokio::test]
async fn test_list_monthly_metrics_with_range() {
    let (app, _db) = setup_seeded_app(6);

    let response = get(app.clone(), "/api/sales/monthly/all?from=2023-02-01&to=2023-03-31").await;
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = get(app.clone(), "/api/sales/monthly/all?from=2023-05-01&to=2023-01-01").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/sales/monthly/all?from=yesterday").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monthly_insights() {
    let (app, _db) = setup_seeded_app(3);

    let response = get(app, "/api/sales/monthly/insights").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    assert_eq!(insights.len(), 3);

    // First month has nothing to compare against
    assert!(insights[0].get("momGrowthValuePct").is_none());
    assert_eq!(insights[0]["avgTicket"], 75.0);

    // 150 -> 160
    let growth = insights[1]["momGrowthValuePct"].as_f64().unwrap();
    assert!((growth - 100.0 / 15.0).abs() < 1e-9);
    assert_eq!(insights[1]["momGrowthSalesPct"], 0.0);
}

#[tokio::test]
async fn test_yearly_insights() {
    let (app, _db) = setup_seeded_app(14);

    let response = get(app, "/api/sales/yearly/insights").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let years = json.as_array().unwrap();
    assert_eq!(years.len(), 2);
    assert_eq!(years[0]["year"], 2023);
    assert_eq!(years[0]["totalSales"], 24);
    assert_eq!(years[0]["bestMonth"], 12);
    assert_eq!(years[0]["worstMonth"], 1);
    assert!(years[0].get("valueGrowthPct").is_none());
    assert!(years[1].get("valueGrowthPct").is_some());
}

// ========== Prediction Tests ==========

#[tokio::test]
async fn test_prediction_defaults() {
    let (app, _db) = setup_seeded_app(4);

    let response = get(app, "/api/prediction").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["metric"], "totalValue");
    assert_eq!(json["basePoints"], 4);

    let forecasts = json["forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), 3);
    assert_eq!(forecasts[0]["method"], "linear");
    assert_eq!(forecasts[1]["method"], "movingAverage");
    assert_eq!(forecasts[2]["method"], "holtWinters");

    // 150, 160, 170, 180 continues on the same line
    assert_eq!(
        forecasts[0]["values"],
        serde_json::json!([190.0, 200.0, 210.0])
    );
}

#[tokio::test]
async fn test_prediction_metric_and_months() {
    let (app, _db) = setup_seeded_app(4);

    let response = get(app, "/api/prediction?metric=totalSales&months=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["metric"], "totalSales");
    assert_eq!(json["forecasts"][0]["values"], serde_json::json!([2.0, 2.0]));
}

#[tokio::test]
async fn test_prediction_rejects_bad_input() {
    let (app, _db) = setup_seeded_app(4);

    for uri in [
        "/api/prediction?months=0",
        "/api/prediction?months=25",
        "/api/prediction?months=three",
        "/api/prediction?metric=revenue",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = get_body_json(response).await;
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_prediction_needs_history() {
    let (app, _db) = setup_seeded_app(2);

    let response = get(app, "/api/prediction").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Not enough historical data"));
}

#[tokio::test]
async fn test_prediction_chart() {
    let (app, _db) = setup_seeded_app(4);

    let response = get(app, "/api/prediction/chart?periods=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["label"], "current");
    assert_eq!(rows[0]["base"], 4);
    assert_eq!(rows[1]["label"], "M+1");
    assert_eq!(rows[1]["linear"], 190.0);
    assert_eq!(rows[2]["label"], "M+2");
    assert!(rows[2].get("base").is_none());
}

// ========== History and Audit Tests ==========

#[tokio::test]
async fn test_list_imports() {
    let db = Database::in_memory().unwrap();
    db.import_csv(SAMPLE_CSV.as_bytes(), Some("vendas.csv"), None, false)
        .unwrap();
    let app = create_router(db, open_config());

    let response = get(app, "/api/imports").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let sessions = json.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["filename"], "vendas.csv");
    assert_eq!(sessions[0]["rowsInserted"], 3);
}

#[tokio::test]
async fn test_reads_are_audited() {
    let (app, db) = setup_seeded_app(4);

    get(app.clone(), "/api/sales/monthly/all").await;
    get(app.clone(), "/api/prediction?months=2").await;

    let response = get(app, "/api/audit?limit=5000").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let entries = db.list_audit_log(10).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].entity_type.as_deref(), Some("audit_log"));
    // Limit is capped
    assert_eq!(entries[0].details.as_deref(), Some("limit=1000"));
    assert_eq!(entries[1].entity_type.as_deref(), Some("prediction"));
    assert_eq!(entries[2].entity_type.as_deref(), Some("monthly_metrics"));
}

#[tokio::test]
async fn test_bad_limit_is_json_error() {
    let app = setup_test_app();

    for uri in ["/api/audit?limit=abc", "/api/imports?limit=abc"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Invalid limit: abc");
    }

    // Blank means default
    let response = get(app, "/api/audit?limit=").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Authentication Tests ==========

fn auth_app() -> Router {
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    create_router(Database::in_memory().unwrap(), config)
}

#[tokio::test]
async fn test_auth_required() {
    let response = get(auth_app(), "/api/sales/monthly/all").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Authentication required");
}

#[tokio::test]
async fn test_auth_with_api_key() {
    let response = auth_app()
        .oneshot(
            Request::builder()
                .uri("/api/sales/monthly/all")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_auth_wrong_key() {
    for value in ["Bearer wrong-key", "Bearer ", "secret-key", "Bearer secret-key-2"] {
        let response = auth_app()
            .oneshot(
                Request::builder()
                    .uri("/api/sales/monthly/all")
                    .header("authorization", value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", value);
    }
}

#[tokio::test]
async fn test_api_key_user_is_audited() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
        api_keys: vec!["secret-key".to_string()],
    };
    let app = create_router(db.clone(), config);

    app.oneshot(
        Request::builder()
            .uri("/api/sales/yearly/insights")
            .header("authorization", "Bearer secret-key")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let entries = db.list_audit_log(1).unwrap();
    assert_eq!(entries[0].user_email, "api-key");
}

#[tokio::test]
async fn test_security_headers() {
    let response = get(setup_test_app(), "/api/imports").await;

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["alpha".to_string(), "beta-key".to_string()];
    assert!(validate_api_key("alpha", &keys));
    assert!(validate_api_key("beta-key", &keys));
    assert!(!validate_api_key("alph", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("alpha", &[]));
}

#[test]
fn test_parse_api_keys() {
    assert_eq!(
        parse_api_keys(" one, two ,,three "),
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    );
    assert!(parse_api_keys("").is_empty());
}
