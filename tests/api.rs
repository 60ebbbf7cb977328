//! End-to-end tests over the assembled router: one request per hop, no
//! running server.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use venuehub_app::build_registry;
use venuehub_kernel::AppContext;

fn app() -> Router {
    let ctx = AppContext::default();
    let registry = build_registry(&ctx);
    venuehub_http::build_router(&registry, &ctx)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn signup(app: &Router, email: &str, role: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/accounts/signup",
            None,
            Some(json!({
                "email": email,
                "password": "correct-horse-battery",
                "full_name": "Integration Tester",
                "role": role
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_responds() {
    let response = app()
        .oneshot(request(Method::GET, "/healthz", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app();
    for uri in [
        "/api/bookings/mine",
        "/api/favorites",
        "/api/notifications",
        "/api/dashboard/host",
        "/api/accounts/me",
    ] {
        let response = app
            .clone()
            .oneshot(request(Method::GET, uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
    }
}

#[tokio::test]
async fn venue_listing_is_public() {
    let response = app()
        .oneshot(request(Method::GET, "/api/venues", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn booking_flow_from_signup_to_conflict() {
    let app = app();

    let host_token = signup(&app, "host@example.com", "host").await;
    let guest_token = signup(&app, "guest@example.com", "guest").await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/venues",
            Some(&host_token),
            Some(json!({
                "name": "Panorama Hall",
                "address": "Panenska 6",
                "city": "Bratislava",
                "capacity": 30,
                "price_per_hour": 150.0
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let venue = body_json(response).await;
    let venue_id = venue["id"].as_str().unwrap().to_string();

    let booking = json!({
        "venue_id": venue_id,
        "date": "2026-09-12",
        "start_time": "14:00:00",
        "end_time": "18:00:00",
        "guest_count": 10,
        "total_price": 600.0
    });
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/bookings",
            Some(&guest_token),
            Some(booking.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same venue, same window: refused.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/bookings",
            Some(&guest_token),
            Some(booking),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The host sees the request on their side.
    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/bookings/host",
            Some(&host_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn guest_is_forbidden_from_host_surfaces() {
    let app = app();
    let guest_token = signup(&app, "onlyguest@example.com", "guest").await;

    for (method, uri) in [
        (Method::GET, "/api/dashboard/host"),
        (Method::GET, "/api/venues/mine"),
        (Method::GET, "/api/bookings/host"),
    ] {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(&guest_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri {uri}");
    }
}

#[tokio::test]
async fn validation_failures_surface_field_details() {
    let app = app();
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/accounts/signup",
            None,
            Some(json!({ "email": "not-an-email", "password": "short" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"].as_array().is_some_and(|d| !d.is_empty()));
}
