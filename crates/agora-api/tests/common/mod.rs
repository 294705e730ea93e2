#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use agora_api::{AppState, AppStateInner, TokenKeys, router};
use agora_db::Database;

pub const SECRET: &str = "integration-test-secret";

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// The full router over a throwaway database file.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    path: PathBuf,
}

impl TestApp {
    pub fn new(name: &str) -> Self {
        let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "agora_api_test_{}_{}_{}.db",
            name,
            std::process::id(),
            n
        ));
        let _ = fs::remove_file(&path);

        let db = Database::open(&path).unwrap();
        let tokens = TokenKeys::new(SECRET.as_bytes(), Duration::hours(24));
        let state = AppStateInner::new(db, tokens);
        let router = router(state.clone());

        Self { state, router, path }
    }

    /// Create a user straight in the store (skips password hashing) and hand
    /// back its id with a fresh token.
    pub fn user(&self, nickname: &str) -> (i64, String) {
        let row = self
            .state
            .db
            .create_user(nickname, &format!("{nickname}@example.com"), "unused-hash")
            .unwrap();
        let token = self.state.tokens.issue(row.id).unwrap();
        (row.id, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = fs::remove_file(p);
        }
    }
}
