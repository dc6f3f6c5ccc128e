use axum::http::StatusCode;
use communityboard::config::AuthMode;
use serde_json::json;

mod common;
use common::{Caller, register_user, request, send, test_app};

#[tokio::test]
async fn register_returns_user_and_token() {
    let app = test_app(AuthMode::Token);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            Caller::Anonymous,
            Some(json!({ "name": "Olga", "email": "olga@example.com", "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["email"], "olga@example.com");
    assert!(body["user"].get("password").is_none());
    assert!(body["token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = test_app(AuthMode::Token);
    register_user(&app, "Olga", "olga@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            Caller::Anonymous,
            Some(json!({ "name": "Other", "email": "olga@example.com", "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Email already registered" })
    );
}

#[tokio::test]
async fn register_validates_fields() {
    let app = test_app(AuthMode::Token);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            Caller::Anonymous,
            Some(json!({ "name": "", "email": "nope", "password": "123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    for field in ["name", "email", "password"] {
        assert!(body["fields"][field].is_array(), "missing error for {field}");
    }
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = test_app(AuthMode::Token);
    let (user_id, _) = register_user(&app, "Olga", "olga@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Caller::Anonymous,
            Some(json!({ "email": "olga@example.com", "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], json!(user_id));

    let token = body["token"].as_str().unwrap();
    let (status, mine) = send(&app, request("GET", "/events/my", Caller::Token(token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine, json!([]));
}

#[tokio::test]
async fn bad_credentials_are_401() {
    let app = test_app(AuthMode::Token);
    register_user(&app, "Olga", "olga@example.com").await;

    for (email, password) in [
        ("olga@example.com", "wrong-password"),
        ("ghost@example.com", "secret123"),
    ] {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/auth/login",
                Caller::Anonymous,
                Some(json!({ "email": email, "password": password })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Invalid email or password" })
        );
    }
}

#[tokio::test]
async fn token_signed_with_another_secret_is_refused() {
    let app = test_app(AuthMode::Token);
    let (user_id, _) = register_user(&app, "Olga", "olga@example.com").await;

    let identity = communityboard::models::user::Identity {
        id: user_id,
        name: "Olga".into(),
        email: "olga@example.com".into(),
    };
    let forged = communityboard::core::session::issue(&identity, "not-the-secret", 1).unwrap();

    let (status, _) = send(&app, request("GET", "/events/my", Caller::Token(&forged), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
