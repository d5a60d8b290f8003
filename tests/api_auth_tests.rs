// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication, session cookie and CORS tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(common::request("GET", "/api/me", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let app = common::create_test_app();
    let token = common::id_token("uid-1", Some("ayse@mail.com"));

    let response = app
        .router
        .oneshot(common::request("GET", "/api/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["uid"], "uid-1");
    assert_eq!(body["email"], "ayse@mail.com");
}

#[tokio::test]
async fn test_token_signed_by_unknown_key_is_rejected() {
    let app = common::create_test_app();
    let claims = common::id_token_claims("uid-1", None);
    let token = common::sign_token(&claims, common::OTHER_PRIVATE_KEY, common::TEST_KID);

    let response = app
        .router
        .oneshot(common::request("GET", "/api/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_token_with_unknown_kid_is_rejected() {
    let app = common::create_test_app();
    let claims = common::id_token_claims("uid-1", None);
    let token = common::sign_token(&claims, common::TEST_PRIVATE_KEY, "rotated-away");

    let response = app
        .router
        .oneshot(common::request("GET", "/api/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_claim_checks() {
    let cases = [
        ("aud", json!("other-project")),
        ("iss", json!("https://securetoken.google.com/other-project")),
        ("sub", json!("")),
        ("exp", json!(1_000_000_000u64)),
        ("iat", json!(4_000_000_000u64)),
        ("auth_time", json!(4_000_000_000u64)),
    ];

    for (claim, value) in cases {
        let app = common::create_test_app();
        let mut claims = common::id_token_claims("uid-1", None);
        claims[claim] = value;
        let token = common::sign_token(&claims, common::TEST_PRIVATE_KEY, common::TEST_KID);

        let response = app
            .router
            .oneshot(common::request("GET", "/api/me", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "bad {claim} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_session_cookie_round_trip() {
    let app = common::create_test_app();
    let token = common::id_token("uid-1", None);

    let response = app
        .router
        .clone()
        .oneshot(common::request(
            "POST",
            "/auth/session",
            None,
            Some(json!({ "id_token": token })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("__session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));

    // The cookie alone authenticates.
    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, format!("__session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_rejects_bad_token() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(common::request(
            "POST",
            "/auth/session",
            None,
            Some(json!({ "id_token": "not-a-jwt" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(common::request("POST", "/auth/logout", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("__session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_logout_with_session_cookie_expires_it() {
    let app = common::create_test_app();
    let token = common::id_token("u1", None);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, format!("__session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("__session=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_health_is_public() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(common::request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/me")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/me")
                .header(header::ORIGIN, "https://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
