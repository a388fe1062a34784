//! Ownership and visibility tests
//!
//! Covers the boundary rules: authentication required everywhere except
//! health and register/login, owner-only mutation, private-record
//! visibility, and the guarantee that credentials never leak in responses.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use brewlog_api::{build_router, AppState};

async fn setup_app() -> axum::Router {
    let db = brewlog_api::db::connect_memory()
        .await
        .expect("Should open in-memory database");
    build_router(AppState::new(db, 30))
}

fn request(method: &str, uri: &str, body: Option<&Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn extract_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn register(app: &axum::Router, username: &str) -> String {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "displayName": username,
        "password": "secret123",
    });
    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/register", Some(&body), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn create_coffee(app: &axum::Router, cookie: &str, body: Value) -> String {
    let response = app
        .clone()
        .oneshot(request("POST", "/api/coffees", Some(&body), Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = extract_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_endpoints_reject_missing_session() {
    let app = setup_app().await;

    let cases = [
        ("GET", "/api/coffees"),
        ("POST", "/api/coffees"),
        ("GET", "/api/feed"),
        ("GET", "/api/stats"),
        ("GET", "/api/auth/me"),
        ("POST", "/api/auth/logout"),
    ];
    for (method, uri) in cases {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(&json!({})), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn garbage_session_cookie_is_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(request(
            "GET",
            "/api/coffees",
            None,
            Some("brewlog_session=deadbeef"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn private_coffee_is_forbidden_to_others() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;

    let id = create_coffee(
        &app,
        &ana,
        json!({ "name": "Secret Stash", "roaster": "Hillside", "isPrivate": true }),
    )
    .await;

    // Collection endpoint signals 403
    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/coffees/{id}"), None, Some(&ben)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Feed endpoint hides existence behind 404
    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/feed/{id}"), None, Some(&ben)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Owner still sees it through both
    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/coffees/{id}"), None, Some(&ana)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn only_the_owner_may_mutate_a_coffee() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;

    let id = create_coffee(&app, &ana, json!({ "name": "Kenya AA", "roaster": "Hillside" })).await;

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/coffees/{id}"),
            Some(&json!({ "rating": 1 })),
            Some(&ben),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/api/coffees/{id}"), None, Some(&ben)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Profile creation on someone else's coffee is likewise forbidden
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/coffees/{id}/profile"),
            Some(&json!({ "acidityLevel": 3 })),
            Some(&ben),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The record is untouched
    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/coffees/{id}"), None, Some(&ana)))
        .await
        .unwrap();
    let json = extract_json(response).await;
    assert_eq!(json["data"]["rating"], 0);
}

#[tokio::test]
async fn soft_deleted_records_vanish_from_the_feed() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;

    let id = create_coffee(&app, &ana, json!({ "name": "Kenya AA", "roaster": "Hillside" })).await;

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/api/coffees/{id}"), None, Some(&ana)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/feed", None, Some(&ben)))
        .await
        .unwrap();
    let json = extract_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/feed/{id}"), None, Some(&ben)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn credentials_never_appear_in_responses() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    create_coffee(&app, &ana, json!({ "name": "Kenya AA", "roaster": "Hillside" })).await;

    for uri in ["/api/auth/me", "/api/coffees", "/api/feed"] {
        let response = app
            .clone()
            .oneshot(request("GET", uri, None, Some(&ana)))
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(!body.contains("passwordHash"), "leak in {uri}");
        assert!(!body.contains("password_hash"), "leak in {uri}");
        assert!(!body.contains("secret123"), "leak in {uri}");
    }
}
