use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use cardvault_auth_types::identity::JwtSecret;
use cardvault_catalog::router::build_router;
use cardvault_catalog::state::AppState;
use cardvault_domain::card::Currency;
use cardvault_testing::auth::{MockAuth, TEST_JWT_SECRET};

const CARD_ID: &str = "0190b6a0-0000-7000-8000-000000000001";

/// Router over a disconnected database: only requests rejected before any
/// query can be exercised here.
fn app() -> Router {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: JwtSecret::new(TEST_JWT_SECRET),
        price_currency: Currency::Usd,
    };
    build_router(state, Duration::from_secs(5))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let resp = app().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn body_request(
    method: Method,
    uri: &str,
    auth: &MockAuth,
    body: impl Into<Body>,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth.bearer())
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn json_request(method: Method, uri: &str, auth: &MockAuth, body: Value) -> Request<Body> {
    body_request(method, uri, auth, body.to_string())
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_be_live_but_not_ready_without_database() {
    let (status, _) = send(get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ── Guards ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_for_collections() {
    let (status, body) = send(get("/collections")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_token_signed_with_other_secret() {
    let token = MockAuth::user().token("some-other-secret");
    let request = Request::get("/profiles/@me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_forbid_catalog_writes_for_non_admin() {
    let user = MockAuth::user();
    let body = serde_json::json!({ "name": "Pikachu", "game": "pokemon" });
    let (status, body) = send(json_request(Method::POST, "/cards", &user, body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_forbid_price_deletion_for_non_admin() {
    let request = Request::delete(format!("/prices/{CARD_ID}"))
        .header(header::AUTHORIZATION, MockAuth::user().bearer())
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ── Validation before storage ────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_non_positive_price_from_admin() {
    let admin = MockAuth::admin();
    let body = serde_json::json!({ "card_id": CARD_ID, "price": "0.00" });
    let (status, body) = send(json_request(Method::POST, "/prices", &admin, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_PRICE");
}

#[tokio::test]
async fn should_reject_invalid_history_condition() {
    let uri = format!("/prices/cards/{CARD_ID}/history?condition=pristine");
    let (status, body) = send(get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_CONDITION");
}

#[tokio::test]
async fn should_reject_out_of_range_days_and_limit() {
    let uri = format!("/prices/cards/{CARD_ID}/history?days=366");
    let (status, body) = send(get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_DAYS");

    let (status, body) = send(get("/prices/top-gainers?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_LIMIT");
}

#[tokio::test]
async fn should_reject_malformed_path_id_and_query() {
    let (status, body) = send(get("/cards/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_ID");

    let (status, body) = send(get("/prices/top-gainers?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_QUERY");
}

#[tokio::test]
async fn should_reject_unknown_sort_and_game() {
    let (status, body) = send(get("/cards?sort-by=price-desc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_SORT");

    let (status, body) = send(get("/prices/top-gainers?game=chess")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_GAME");
}

#[tokio::test]
async fn should_reject_zero_quantity_add() {
    let user = MockAuth::user();
    let body = serde_json::json!({ "card_id": CARD_ID, "quantity": 0 });
    let (status, body) = send(json_request(Method::POST, "/collections", &user, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_QUANTITY");
}

#[tokio::test]
async fn should_reject_reserved_username() {
    let user = MockAuth::user();
    let body = serde_json::json!({ "username": "me" });
    let (status, body) = send(json_request(Method::PUT, "/profiles/@me", &user, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_USERNAME");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let user = MockAuth::user();
    let request = body_request(Method::POST, "/collections", &user, "{not json");
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_BODY");
}

#[tokio::test]
async fn should_reject_mistyped_body_field_as_bad_request() {
    let user = MockAuth::user();
    let body = serde_json::json!({ "card_id": CARD_ID, "quantity": "lots" });
    let (status, body) = send(json_request(Method::POST, "/collections", &user, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_BODY");
    assert!(body["error"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn should_reject_body_without_json_content_type() {
    let request = Request::put("/profiles/@me")
        .header(header::AUTHORIZATION, MockAuth::user().bearer())
        .body(Body::from(r#"{"display_name":"Ash"}"#))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_BODY");
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_json_404_for_unknown_path() {
    let (status, body) = send(get("/decks")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn should_return_json_405_for_wrong_method() {
    let request = Request::patch("/cards").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["kind"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn should_answer_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/cards")
        .header(header::ORIGIN, "https://cards.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
