//! HTTP behaviour of the router over an in-memory store

mod helpers;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use helpers::*;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

/// Register a fresh account and return its token and id
async fn register(app: &Router) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "email": unique_email(), "password": TEST_PASSWORD, "first_name": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["user_id"].as_str().unwrap().to_string(),
    )
}

fn event_body(max_participants: i32) -> Value {
    json!({
        "title": "Pottery",
        "date": "2030-05-01T18:00:00Z",
        "location": "Studio 4",
        "event_type": "workshop",
        "max_participants": max_participants
    })
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let (status, body) = send(&ctx.router(), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 0);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let email = unique_email();

    let (status, body) = send(&app, Method::POST, "/register", None, Some(json!({ "email": email, "password": TEST_PASSWORD }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "bearer");

    let (status, body) = send(&app, Method::POST, "/register", None, Some(json!({ "email": email, "password": TEST_PASSWORD }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("already registered"));

    let (status, body) = send(&app, Method::POST, "/login", None, Some(json!({ "email": email, "password": TEST_PASSWORD }))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_unauthorized_responses_carry_challenge() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let request = Request::builder().uri("/users/me").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let (status, body) = send(&app, Method::POST, "/login", None, Some(json!({ "email": "nobody@example.com", "password": "whatever-pass" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect username or password");

    let (status, _) = send(&app, Method::GET, "/users/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_requests_get_detail_body() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let (status, body) = send(&app, Method::POST, "/register", None, Some(json!({ "email": "a@example.com" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("password"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, Method::GET, "/events?limit=many", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, Method::GET, "/events/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_email_change_reissues_token() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let (token, user_id) = register(&app).await;

    let (status, body) = send(&app, Method::PUT, "/users/me", Some(&token), Some(json!({ "bio": "Potter" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["bio"], "Potter");
    assert!(body.get("token").is_none());

    let new_email = unique_email().to_lowercase();
    let (status, body) = send(&app, Method::PUT, "/users/me", Some(&token), Some(json!({ "email": new_email }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], new_email.as_str());
    assert_eq!(body["token"]["user_id"], user_id.as_str());
    let fresh = body["token"]["access_token"].as_str().unwrap().to_string();

    // the old token names the old email
    let (status, _) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, Method::GET, "/users/me", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], new_email.as_str());
}

#[tokio::test]
async fn test_event_join_flow_over_http() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let (host, _) = register(&app).await;
    let (first, first_id) = register(&app).await;
    let (second, _) = register(&app).await;

    let (status, event) = send(&app, Method::POST, "/events", Some(&host), Some(event_body(1))).await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["id"].as_str().unwrap().to_string();
    let join = format!("/users/me/participate/{}", event_id);

    let (status, body) = send(&app, Method::POST, &join, Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participants"], json!([first_id]));

    let (status, body) = send(&app, Method::POST, &join, Some(&second), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("Capacity reached"));

    let (status, body) = send(&app, Method::GET, &format!("/events/{}/participants", event_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, &join, Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participants"], json!([]));
}

#[tokio::test]
async fn test_only_creator_may_change_group() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let (owner, _) = register(&app).await;
    let (other, _) = register(&app).await;

    let (status, group) = send(&app, Method::POST, "/groups", Some(&owner), Some(json!({ "name": "Chess", "max_participants": 8 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/groups/{}", group["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PUT, &uri, Some(&other), Some(json!({ "name": "Go" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&owner), Some(json!({ "name": "Go" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Go");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_relation_lists() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let (token, user_id) = register(&app).await;

    let uri = format!("/users/{}/created_events", user_id);
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No events found for this user");

    send(&app, Method::POST, "/events", Some(&token), Some(event_body(3))).await;
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/users/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_limit_is_bounded() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let (status, _) = send(&app, Method::GET, "/events?limit=500", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, body) = send(&app, Method::GET, "/events?limit=10&offset=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_me() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let (token, user_id) = register(&app).await;

    let (status, _) = send(&app, Method::DELETE, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/users/{}", user_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // the token now names an unknown subject
    let (status, _) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
