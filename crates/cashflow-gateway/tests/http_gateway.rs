//! HttpForecastGateway against a local axum server imitating the remote API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use cashflow_config::WorkflowStatus;
use cashflow_gateway::{
    AccountSearchField, DateWindow, ForecastGatewayTrait, GatewayError, HttpForecastGateway,
    PageRequest, RejectionRequest, SearchField,
};

#[derive(Default)]
struct Recorded {
    queries: Vec<(String, HashMap<String, String>)>,
    bodies: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 200, "status": "success", "data": data}))
}

async fn pending_list(State(rec): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    rec.lock().unwrap().queries.push(("pending-list".to_string(), q));
    ok(json!({
        "content": [{"id": 7, "referenceNo": "REF-7", "corporateCode": "C01", "forecastedAmount": 1500}],
        "totalPages": 3,
        "totalElements": 25
    }))
}

async fn pending_search(State(rec): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    rec.lock().unwrap().queries.push(("pending-list/search".to_string(), q));
    ok(json!({"content": [{"id": 3, "corporateName": "Acme & Sons"}]}))
}

async fn reject_all(State(rec): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    rec.lock().unwrap().bodies.push(("rejectAll".to_string(), body));
    ok(Value::Null)
}

async fn authorize_all(State(rec): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    rec.lock().unwrap().bodies.push(("authorizeAll".to_string(), body));
    ok(Value::Null)
}

async fn authorize_one(Path(id): Path<u64>) -> Json<Value> {
    if id == 9 {
        Json(json!({"code": 409, "status": "failed", "message": "entry locked"}))
    } else {
        ok(Value::Null)
    }
}

async fn forecast(Path(id): Path<u64>) -> Json<Value> {
    if id == 1 {
        ok(json!({
            "id": 1,
            "corporateCode": "C01",
            "corporateName": "Acme",
            "forecastingAs": "Inward Payment",
            "entryType": "O",
            "narration": "Invoice 42",
            "mode": "cash",
            "accountType": "internalAccount",
            "accountNumber": "internalAcc001",
            "forecastedAmount": 2500.75,
            "lockRecord": true,
            "valueDate": "2026-11-01"
        }))
    } else {
        Json(json!({"code": 404, "status": "error", "message": "not found"}))
    }
}

async fn update_forecast(State(rec): State<Shared>, Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    rec.lock().unwrap().bodies.push((format!("forecasts/{}", id), body));
    ok(Value::Null)
}

async fn corporate_by_name(State(rec): State<Shared>, Path(name): Path<String>) -> Json<Value> {
    let mut q = HashMap::new();
    q.insert("name".to_string(), name);
    rec.lock().unwrap().queries.push(("corporate-name".to_string(), q));
    ok(json!({"content": [{"id": 4, "corporateCode": "C04", "corporateName": "Acme & Sons"}]}))
}

async fn accounts_search(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    if q.get("accountNumber").map(|s| s.as_str()) == Some("AC-404") {
        ok(json!([]))
    } else {
        ok(json!([{"accountNumber": "AC-1", "accountTitle": "Operating"}]))
    }
}

async fn range_summary(State(rec): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    rec.lock().unwrap().queries.push(("custom-range-summary".to_string(), q));
    ok(json!({"openingBalance": 1000, "closingBalance": 1250.5}))
}

async fn spawn_remote() -> (HttpForecastGateway, Shared) {
    let recorded: Shared = Arc::new(Mutex::new(Recorded::default()));
    let router = Router::new()
        .route("/api/pending-list", get(pending_list))
        .route("/api/pending-list/search", get(pending_search))
        .route("/api/rejected", get(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/api/review-list",
            get(|| async { Json(json!({"code": 500, "status": "error", "message": "boom"})) }),
        )
        .route("/api/rejectAll", post(reject_all))
        .route("/api/pending-list/authorizeAll", post(authorize_all))
        .route("/api/pending-list/authorize/:id", post(authorize_one))
        .route("/api/forecasts/:id", get(forecast).put(update_forecast))
        .route("/api/corporate/corporate-name/:name", get(corporate_by_name))
        .route(
            "/api/accounts/by-type",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down").into_response() }),
        )
        .route("/api/accounts/search", get(accounts_search))
        .route("/api/transactions/custom-range-summary", get(range_summary))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let gateway = HttpForecastGateway::with_client(reqwest::Client::new(), &format!("http://{}/api", addr));
    (gateway, recorded)
}

#[tokio::test]
async fn test_list_sends_page_params_and_tags_status() {
    let (gw, rec) = spawn_remote().await;
    let page = gw.list(WorkflowStatus::Pending, PageRequest::new(2, 10)).await.unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_elements, 25);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, 7);
    assert_eq!(page.content[0].status, WorkflowStatus::Pending);

    let rec = rec.lock().unwrap();
    let (_, q) = &rec.queries[0];
    assert_eq!(q.get("page").map(String::as_str), Some("2"));
    assert_eq!(q.get("size").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn test_no_content_and_failed_envelope_are_empty_pages() {
    let (gw, _) = spawn_remote().await;
    let rejected = gw.list(WorkflowStatus::Rejected, PageRequest::first(10)).await.unwrap();
    assert!(rejected.is_empty());
    assert_eq!(rejected.total_pages, 0);

    let review = gw.list(WorkflowStatus::Review, PageRequest::first(10)).await.unwrap();
    assert!(review.is_empty());
}

#[tokio::test]
async fn test_search_uses_field_param() {
    let (gw, rec) = spawn_remote().await;
    let page = gw
        .search(WorkflowStatus::Pending, SearchField::CorporateName, "Acme & Sons", PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(page.content[0].id, 3);
    assert_eq!(page.total_pages, 1);

    let rec = rec.lock().unwrap();
    let (endpoint, q) = &rec.queries[0];
    assert_eq!(endpoint, "pending-list/search");
    assert_eq!(q.get("corporateName").map(String::as_str), Some("Acme & Sons"));
}

#[tokio::test]
async fn test_reject_posts_reason_and_ids() {
    let (gw, rec) = spawn_remote().await;
    let request = RejectionRequest { rejection_reason: "duplicate".to_string(), ids: vec![1, 2] };
    gw.reject(&request).await.unwrap();

    let rec = rec.lock().unwrap();
    assert_eq!(rec.bodies.len(), 1);
    assert_eq!(rec.bodies[0].1, json!({"rejectionReason": "duplicate", "ids": [1, 2]}));
}

#[tokio::test]
async fn test_authorize_all_posts_id_array() {
    let (gw, rec) = spawn_remote().await;
    gw.authorize_all(&[7, 8]).await.unwrap();
    assert_eq!(rec.lock().unwrap().bodies[0].1, json!([7, 8]));
}

#[tokio::test]
async fn test_authorize_failed_envelope_is_error() {
    let (gw, _) = spawn_remote().await;
    assert!(gw.authorize(5).await.is_ok());
    match gw.authorize(9).await {
        Err(GatewayError::Envelope { code, message, .. }) => {
            assert_eq!(code, 409);
            assert_eq!(message, "entry locked");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_forecast_read_and_update() {
    let (gw, rec) = spawn_remote().await;
    let mut entry = gw.forecast(1).await.unwrap();
    assert_eq!(entry.corporate_code, "C01");
    assert_eq!(entry.narration, "Invoice 42");
    assert!(entry.lock_record);
    assert!(entry.description.is_empty());

    entry.narration = "Invoice 43".to_string();
    gw.update_forecast(1, &entry).await.unwrap();
    let rec = rec.lock().unwrap();
    assert_eq!(rec.bodies[0].0, "forecasts/1");
    assert_eq!(rec.bodies[0].1["narration"], json!("Invoice 43"));
}

#[tokio::test]
async fn test_forecast_missing_is_envelope_error() {
    let (gw, _) = spawn_remote().await;
    assert!(matches!(gw.forecast(2).await, Err(GatewayError::Envelope { code: 404, .. })));
}

#[tokio::test]
async fn test_corporate_name_is_path_encoded() {
    let (gw, rec) = spawn_remote().await;
    let found = gw.corporates_by_name("Acme & Sons").await.unwrap();
    assert_eq!(found[0].id, 4);
    let rec = rec.lock().unwrap();
    assert_eq!(rec.queries[0].1.get("name").map(String::as_str), Some("Acme & Sons"));
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let (gw, _) = spawn_remote().await;
    let err = gw.accounts_by_type("Internal Account", 3).await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, GatewayError::Server { status: 500, .. }));
}

#[tokio::test]
async fn test_account_search_empty_data() {
    let (gw, _) = spawn_remote().await;
    let none = gw.search_accounts(AccountSearchField::AccountNumber, "AC-404").await.unwrap();
    assert!(none.is_empty());
    let some = gw.search_accounts(AccountSearchField::AccountTitle, "Operating").await.unwrap();
    assert_eq!(some[0].account_number, "AC-1");
}

#[tokio::test]
async fn test_range_summary_formats_window() {
    let (gw, rec) = spawn_remote().await;
    let window = DateWindow {
        start: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        end: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
    };
    let summary = gw.range_summary("AC-1", Some(window)).await.unwrap().unwrap();
    assert_eq!(summary.closing_balance.to_string(), "1250.5");

    gw.range_summary("AC-1", None).await.unwrap();

    let rec = rec.lock().unwrap();
    let ranged = &rec.queries[0].1;
    assert_eq!(ranged.get("startDate").map(String::as_str), Some("2026-01-31"));
    assert_eq!(ranged.get("endDate").map(String::as_str), Some("2026-07-31"));
    let unranged = &rec.queries[1].1;
    assert_eq!(unranged.get("startDate").map(String::as_str), Some(""));
}
