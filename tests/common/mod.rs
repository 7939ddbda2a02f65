//! Shared test helpers: lazily connected state for HTTP tests, and a throwaway
//! PostgreSQL schema for CRUD tests when `TEST_DATABASE_URL` is set.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceExt;
use tracker_api::{app, apply_migrations, resolve, tracker_catalog, AppState, ResolvedModel};

/// State whose pool never connects until used; handlers that fail validation never use it.
pub fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://nobody@127.0.0.1:1/unused")
        .unwrap();
    AppState::new(pool, resolve(&tracker_catalog("tracker")).unwrap())
}

pub fn router(state: AppState) -> Router {
    app(state, 1024 * 1024).unwrap()
}

/// Send one request; returns status and parsed JSON body (Null when empty).
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status().as_u16();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub struct TestDb {
    pub pool: PgPool,
    pub model: ResolvedModel,
    schema: String,
}

impl TestDb {
    pub fn state(&self) -> AppState {
        AppState::new(self.pool.clone(), self.model.clone())
    }

    pub async fn cleanup(self) {
        sqlx::query(&format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.schema))
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

/// Fresh schema with the tracker tables, or None when no test database is configured.
pub async fn test_db() -> Option<TestDb> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };
    let schema = format!("tracker_test_{}", uuid::Uuid::new_v4().simple());
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .unwrap();
    let model = resolve(&tracker_catalog(&schema)).unwrap();
    apply_migrations(&pool, &model).await.unwrap();
    Some(TestDb { pool, model, schema })
}
