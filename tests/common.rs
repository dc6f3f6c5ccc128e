#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use communityboard::config::{AuthMode, Config};
use communityboard::db::migrate::run_pending_migrations;
use communityboard::db::pool::DbPool;
use communityboard::server::build_router;
use communityboard::server::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// The binary, isolated from the real `~/.communityboard` via `home`.
pub fn cb(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("communityboard");
    cmd.env("COMMUNITYBOARD_HOME", home);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Fresh temp dir plus a database path inside it
pub fn setup_test_db(name: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir
        .path()
        .join(format!("{name}_communityboard.sqlite"))
        .to_string_lossy()
        .to_string();
    (dir, db_path)
}

/// Run `init` in test mode against `db_path`
pub fn init_db(home: &Path, db_path: &str) {
    cb(home)
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub fn test_app(mode: AuthMode) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut cfg = Config::default();
    cfg.database = dir
        .path()
        .join("board.sqlite")
        .to_string_lossy()
        .to_string();
    cfg.auth.mode = mode;
    cfg.auth.secret = TEST_SECRET.to_string();

    let pool = DbPool::from_config(&cfg).expect("open pool");
    pool.with_conn(|conn| run_pending_migrations(conn))
        .expect("migrate");

    let state = AppState::new(pool, cfg);
    TestApp {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

/// Caller credentials attached to a request.
#[derive(Clone, Copy)]
pub enum Caller<'a> {
    Anonymous,
    Token(&'a str),
    Headers(i64, &'a str, &'a str),
}

pub fn request(method: &str, uri: &str, caller: Caller<'_>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    match caller {
        Caller::Anonymous => {}
        Caller::Token(token) => {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        Caller::Headers(id, name, email) => {
            builder = builder
                .header("x-user-id", id.to_string())
                .header("x-user-name", name)
                .header("x-user-email", email);
        }
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// Register through the API; returns (user id, token)
pub async fn register_user(app: &TestApp, name: &str, email: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/auth/register",
            Caller::Anonymous,
            Some(json!({ "name": name, "email": email, "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let id = body["user"]["id"].as_i64().expect("user id");
    let token = body["token"].as_str().expect("token").to_string();
    (id, token)
}

pub fn event_body(title: &str, positions: &[&str]) -> Value {
    json!({
        "title": title,
        "date": "2025-10-10T10:00:00Z",
        "location": "Community Hall",
        "description": "Bring gloves",
        "volunteerPositions": positions,
    })
}

/// Create an event through the API; returns its id
pub async fn create_event(app: &TestApp, token: &str, title: &str, positions: &[&str]) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/events",
            Caller::Token(token),
            Some(event_body(title, positions)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().expect("event id").to_string()
}
