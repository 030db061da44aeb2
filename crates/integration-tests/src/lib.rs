//! Integration tests for Storehouse.
//!
//! # Running Tests
//!
//! ```bash
//! # Router and reconciliation tests (no database needed)
//! cargo test -p storehouse-integration-tests
//!
//! # Database-backed tests against a disposable PostgreSQL database
//! STOREHOUSE_TEST_DATABASE_URL=postgres://localhost/storehouse_test \
//!     cargo test -p storehouse-integration-tests -- --ignored
//! ```
//!
//! The database-backed tests truncate every catalog table, so never point
//! `STOREHOUSE_TEST_DATABASE_URL` at data you care about.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use secrecy::SecretString;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use storehouse_api::config::ApiConfig;
use storehouse_api::state::AppState;

/// A connection string nothing listens on.
pub const UNREACHABLE_DATABASE_URL: &str = "postgres://storehouse@127.0.0.1:1/storehouse";

static LIVE_DB_LOCK: Mutex<()> = Mutex::const_new(());

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// The `message` field of an error or confirmation body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Configuration pointing at `database_url`, everything else defaulted.
#[must_use]
pub fn test_config(database_url: &str) -> ApiConfig {
    ApiConfig::from_lookup(|key| {
        (key == "STOREHOUSE_DATABASE_URL").then(|| database_url.to_string())
    })
    .expect("test config should be valid")
}

/// An app whose pool never connects. Routes that touch the database fail
/// after a short acquire timeout.
#[must_use]
pub fn offline_app() -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy(UNREACHABLE_DATABASE_URL)
        .expect("connection string should parse");
    storehouse_api::app(AppState::new(test_config(UNREACHABLE_DATABASE_URL), pool))
}

/// A migrated, empty test database, or `None` if
/// `STOREHOUSE_TEST_DATABASE_URL` is not set.
///
/// The returned guard serializes tests that share the database.
pub async fn live_db() -> Option<(MutexGuard<'static, ()>, PgPool)> {
    let url = std::env::var("STOREHOUSE_TEST_DATABASE_URL").ok()?;
    let guard = LIVE_DB_LOCK.lock().await;

    let pool = storehouse_api::db::create_pool(&SecretString::from(url), 2)
        .await
        .expect("test database should be reachable");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("migrations should apply");
    sqlx::query("TRUNCATE product_tag, product, tag, category RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("catalog tables should truncate");

    Some((guard, pool))
}

/// An app backed by `pool`.
#[must_use]
pub fn live_app(pool: PgPool) -> Router {
    storehouse_api::app(AppState::new(test_config("postgres://test"), pool))
}

/// Send one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// `GET uri`.
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// `DELETE uri`.
pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

/// `POST uri` with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> TestResponse {
    send(app, json_request("POST", uri, body)).await
}

/// `PUT uri` with a JSON body.
pub async fn put_json(app: &Router, uri: &str, body: &serde_json::Value) -> TestResponse {
    send(app, json_request("PUT", uri, body)).await
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
