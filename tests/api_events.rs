use axum::http::StatusCode;
use communityboard::config::AuthMode;
use serde_json::json;

mod common;
use common::{Caller, create_event, event_body, register_user, request, send, test_app};

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app(AuthMode::Token);
    let (status, body) = send(&app, request("GET", "/health", Caller::Anonymous, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = test_app(AuthMode::Token);
    let (status, body) = send(&app, request("GET", "/nope", Caller::Anonymous, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let app = test_app(AuthMode::Token);
    let (user_id, token) = register_user(&app, "Olga", "olga@example.com").await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/events",
            Caller::Token(&token),
            Some(json!({ "title": "T", "date": "2025-10-10T10:00:00Z", "location": "L" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(created["userId"], json!(user_id));
    assert_eq!(created["volunteerPositions"], json!([]));
    assert_eq!(created["description"], json!(null));

    let (status, fetched) = send(
        &app,
        request("GET", &format!("/events/{id}"), Caller::Anonymous, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "T");
    assert_eq!(fetched["date"], "2025-10-10T10:00:00.000Z");
    assert_eq!(fetched["location"], "L");

    let (_, all) = send(&app, request("GET", "/events", Caller::Anonymous, None)).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_event_is_404() {
    let app = test_app(AuthMode::Token);
    let (status, body) = send(
        &app,
        request("GET", "/events/does-not-exist", Caller::Anonymous, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Event not found" }));
}

#[tokio::test]
async fn mutations_require_identity() {
    let app = test_app(AuthMode::Token);
    let (status, body) = send(
        &app,
        request("POST", "/events", Caller::Anonymous, Some(event_body("T", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Authentication required" }));

    let (status, _) = send(
        &app,
        request("POST", "/events", Caller::Token("forged.token"), Some(event_body("T", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/events/my", Caller::Anonymous, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_bodies_are_rejected_with_field_errors() {
    let app = test_app(AuthMode::Token);
    let (_, token) = register_user(&app, "Olga", "olga@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/events",
            Caller::Token(&token),
            Some(json!({ "title": "", "date": "not a date" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["location"].is_array());
    assert_eq!(body["fields"]["date"], json!(["Invalid date format"]));

    let malformed = axum::http::Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Malformed JSON body" }));
}

#[tokio::test]
async fn patch_changes_only_provided_fields() {
    let app = test_app(AuthMode::Token);
    let (_, token) = register_user(&app, "Olga", "olga@example.com").await;
    let id = create_event(&app, &token, "Beach Cleanup", &["Picker"]).await;

    let (status, updated) = send(
        &app,
        request(
            "PATCH",
            &format!("/events/{id}"),
            Caller::Token(&token),
            Some(json!({ "location": "QA Lab" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "QA Lab");
    assert_eq!(updated["title"], "Beach Cleanup");
    assert_eq!(updated["description"], "Bring gloves");
    assert_eq!(updated["volunteerPositions"], json!(["Picker"]));

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/events/{id}"), Caller::Token(&token), Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["body"],
        json!(["At least one field must be provided"])
    );
}

#[tokio::test]
async fn only_the_owner_may_change_or_delete() {
    let app = test_app(AuthMode::Token);
    let (_, owner) = register_user(&app, "Olga", "olga@example.com").await;
    let (_, other) = register_user(&app, "Ivan", "ivan@example.com").await;
    let id = create_event(&app, &owner, "Food Drive", &[]).await;

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/events/{id}"),
            Caller::Token(&other),
            Some(json!({ "title": "Hijacked" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "You can only update your own events" }));

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/events/{id}"), Caller::Token(&other), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, fetched) = send(
        &app,
        request("GET", &format!("/events/{id}"), Caller::Anonymous, None),
    )
    .await;
    assert_eq!(fetched["title"], "Food Drive");

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            "/events/00000000-0000-4000-8000-000000000000",
            Caller::Token(&other),
            Some(json!({ "title": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_the_event_once() {
    let app = test_app(AuthMode::Token);
    let (_, token) = register_user(&app, "Olga", "olga@example.com").await;
    let id = create_event(&app, &token, "Food Drive", &[]).await;

    let (status, deleted) = send(
        &app,
        request("DELETE", &format!("/events/{id}"), Caller::Token(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], json!(id));

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/events/{id}"), Caller::Token(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filter_and_my_events() {
    let app = test_app(AuthMode::Token);
    let (_, olga) = register_user(&app, "Olga", "olga@example.com").await;
    let (_, ivan) = register_user(&app, "Ivan", "ivan@example.com").await;
    create_event(&app, &olga, "Beach Cleanup", &[]).await;
    create_event(&app, &ivan, "Food Drive", &[]).await;

    let (status, body) = send(&app, request("GET", "/events/search", Caller::Anonymous, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Search term is required" }));

    let (status, hits) = send(
        &app,
        request("GET", "/events/search?q=beach", Caller::Anonymous, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Beach Cleanup");

    let (status, filtered) = send(
        &app,
        request(
            "GET",
            "/events/filter?dateFrom=2025-10-01&dateTo=2025-10-31&location=hall",
            Caller::Anonymous,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        request("GET", "/events/filter?dateFrom=garbage", Caller::Anonymous, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, mine) = send(&app, request("GET", "/events/my", Caller::Token(&ivan), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], "Food Drive");
}

#[tokio::test]
async fn header_identity_mode() {
    let app = test_app(AuthMode::Headers);

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/events",
            Caller::Headers(42, "Legacy", "legacy@example.com"),
            Some(event_body("Legacy Event", &[])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], json!(42));

    let partial = axum::http::Request::builder()
        .method("GET")
        .uri("/events/my")
        .header("x-user-id", "42")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = send(&app, partial).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
