use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;
use server::{StaticTokenVerifier, TokenVerifier};

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        StaticTokenVerifier::default()
            .with_token(ALICE_TOKEN, "user_alice", Some("alice@example.com"))
            .with_token(BOB_TOKEN, "user_bob", Some("bob@example.com")),
    );
    server::app(engine, verifier)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_account(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/accounts",
            Some(token),
            Some(json!({"name": "Main Wallet", "type": "cash"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn create_transaction(
    app: &Router,
    token: &str,
    account_id: &str,
    kind: &str,
    category: &str,
    amount_minor: i64,
    occurred_at: &str,
) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/transactions",
            Some(token),
            Some(json!({
                "accountId": account_id,
                "amountMinor": amount_minor,
                "type": kind,
                "category": category,
                "occurredAt": occurred_at,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = test_app().await;
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = test_app().await;
    let (status, _) = send(&app, request("GET", "/transactions", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/transactions", Some("garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_sync_is_idempotent() {
    let app = test_app().await;
    let payload = json!({"name": "Alice", "username": "alice", "currency": "EUR"});

    let (status, first) = send(
        &app,
        request("POST", "/auth/sync", Some(ALICE_TOKEN), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], "user_alice");
    assert_eq!(first["email"], "alice@example.com");
    assert_eq!(first["currency"], "EUR");

    let (status, second) = send(
        &app,
        request("POST", "/auth/sync", Some(ALICE_TOKEN), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn account_creation_requires_name_and_type() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        request("POST", "/accounts", Some(ALICE_TOKEN), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(ALICE_TOKEN),
            Some(json!({"name": "Main Wallet"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transaction_roundtrip_with_march_balance() {
    let app = test_app().await;
    let account_id = create_account(&app, ALICE_TOKEN).await;

    create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Food",
        5_000,
        "2024-03-05T12:00:00Z",
    )
    .await;

    let (status, list) = send(&app, request("GET", "/transactions", Some(ALICE_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["amountMinor"], 5_000);
    assert_eq!(list[0]["type"], "expense");
    assert_eq!(list[0]["category"], "Food");
    assert_eq!(list[0]["accountId"], account_id.as_str());

    let (status, stats) = send(
        &app,
        request("GET", "/stats?year=2024&month=3", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["expenseMinor"], 5_000);
    assert_eq!(stats["incomeMinor"], 0);
    assert_eq!(stats["balanceMinor"], -5_000);
}

#[tokio::test]
async fn transaction_creation_requires_fields() {
    let app = test_app().await;
    create_account(&app, ALICE_TOKEN).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/transactions",
            Some(ALICE_TOKEN),
            Some(json!({"amountMinor": 5_000})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields");
}

#[tokio::test]
async fn foreign_account_is_not_found() {
    let app = test_app().await;
    let alice_account = create_account(&app, ALICE_TOKEN).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/transactions",
            Some(BOB_TOKEN),
            Some(json!({
                "accountId": alice_account,
                "amountMinor": 5_000,
                "type": "expense",
                "occurredAt": "2024-03-05T12:00:00Z",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transaction_listing_is_per_user() {
    let app = test_app().await;
    let alice_account = create_account(&app, ALICE_TOKEN).await;
    create_transaction(
        &app,
        ALICE_TOKEN,
        &alice_account,
        "expense",
        "Food",
        5_000,
        "2024-03-05T12:00:00Z",
    )
    .await;

    let (status, list) = send(&app, request("GET", "/transactions", Some(BOB_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn transaction_update_and_delete() {
    let app = test_app().await;
    let account_id = create_account(&app, ALICE_TOKEN).await;
    let tx = create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Food",
        5_000,
        "2024-03-05T12:00:00Z",
    )
    .await;
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        request(
            "PUT",
            &format!("/transactions/{tx_id}"),
            Some(ALICE_TOKEN),
            Some(json!({
                "accountId": account_id,
                "amountMinor": 7_500,
                "type": "expense",
                "category": "Groceries",
                "note": "weekly shop",
                "occurredAt": "2024-03-06T12:00:00Z",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amountMinor"], 7_500);
    assert_eq!(updated["category"], "Groceries");

    // Another user's id 404s without leaking existence.
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some(BOB_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_combine_static_and_inferred() {
    let app = test_app().await;
    let account_id = create_account(&app, ALICE_TOKEN).await;
    create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "income",
        "Freelance",
        50_000,
        "2024-03-01T12:00:00Z",
    )
    .await;
    create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Freelance",
        2_000,
        "2024-03-03T12:00:00Z",
    )
    .await;

    let (status, categories) = send(
        &app,
        request("GET", "/categories?context=expense", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let categories = categories.as_array().unwrap();

    let freelance = categories
        .iter()
        .find(|category| category["name"] == "Freelance")
        .unwrap();
    assert_eq!(freelance["source"], "user_defined");
    assert_eq!(freelance["type"], "both");

    let food = categories
        .iter()
        .find(|category| category["name"] == "Food")
        .unwrap();
    assert_eq!(food["source"], "static");
    assert_eq!(food["type"], "expense");
}

#[tokio::test]
async fn category_delete_conflicts_while_referenced() {
    let app = test_app().await;
    let account_id = create_account(&app, ALICE_TOKEN).await;
    let tx = create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Hobby",
        3_000,
        "2024-03-05T12:00:00Z",
    )
    .await;

    let (_, categories) = send(
        &app,
        request("GET", "/categories", Some(ALICE_TOKEN), None),
    )
    .await;
    let hobby_id = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|category| category["name"] == "Hobby")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        request(
            "DELETE",
            &format!("/categories/{hobby_id}"),
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("in use"));

    let tx_id = tx["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/categories/{hobby_id}"),
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_read_and_update() {
    let app = test_app().await;

    let (status, profile) = send(
        &app,
        request("GET", "/user/profile", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["currency"], "USD");

    let (status, _) = send(
        &app,
        request("PUT", "/user/profile", Some(ALICE_TOKEN), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        request(
            "PUT",
            "/user/profile",
            Some(ALICE_TOKEN),
            Some(json!({"name": "Alice", "currency": "EUR"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alice");
    assert_eq!(updated["currency"], "EUR");

    let (_, profile) = send(
        &app,
        request("GET", "/user/profile", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(profile["currency"], "EUR");
}

#[tokio::test]
async fn monthly_report_has_dense_series() {
    let app = test_app().await;
    let account_id = create_account(&app, ALICE_TOKEN).await;
    create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Food",
        1_000,
        "2024-02-01T12:00:00Z",
    )
    .await;
    create_transaction(
        &app,
        ALICE_TOKEN,
        &account_id,
        "expense",
        "Rent",
        90_000,
        "2024-02-29T12:00:00Z",
    )
    .await;

    let (status, report) = send(
        &app,
        request(
            "GET",
            "/stats/monthly?year=2024&month=2",
            Some(ALICE_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let series = report["dailyExpenseMinor"].as_array().unwrap();
    assert_eq!(series.len(), 29);
    let total: i64 = series.iter().map(|v| v.as_i64().unwrap()).sum();
    assert_eq!(total, report["expenseMinor"].as_i64().unwrap());
    assert_eq!(report["categories"][0]["category"], "Rent");
    assert_eq!(report["categories"][1]["category"], "Food");
}

#[tokio::test]
async fn stats_month_filter_needs_both_params() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        request("GET", "/stats?year=2024", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request("GET", "/stats?year=2024&month=13", Some(ALICE_TOKEN), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
