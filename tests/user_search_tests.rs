// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin user search over the four lookup keys.

use axum::http::StatusCode;
use repairoo_api::db::UserSearchField;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn app_with_founder() -> (common::TestApp, String) {
    let app = common::create_test_app();
    let token = common::id_token("boss", Some(common::FOUNDER_EMAIL));
    (app, token)
}

async fn search(app: &common::TestApp, token: &str, q: &str) -> Vec<Value> {
    let uri = format!("/api/admin/users/search?q={}", urlencoding::encode(q));
    let response = app
        .router
        .clone()
        .oneshot(common::request("GET", &uri, Some(token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    match common::body_json(response).await {
        Value::Array(items) => items,
        other => panic!("expected array, got {other}"),
    }
}

fn uids(results: &[Value]) -> Vec<&str> {
    results.iter().map(|r| r["uid"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_blank_query_returns_nothing() {
    let (app, token) = app_with_founder();
    app.db.seed_user("u1", json!({ "email": "", "emailLower": "" }));

    assert!(search(&app, &token, "   ").await.is_empty());
}

#[tokio::test]
async fn test_user_matching_several_keys_appears_once() {
    let (app, token) = app_with_founder();
    app.db.seed_user(
        "u1",
        json!({
            "email": "ali",
            "emailLower": "ali",
            "usernameLower": "ali",
            "displayNameLower": "ali",
            "displayName": "Ali",
        }),
    );

    let results = search(&app, &token, "ali").await;

    assert_eq!(uids(&results), vec!["u1"]);
    assert_eq!(results[0]["display_name"], "Ali");
}

#[tokio::test]
async fn test_results_keep_first_occurrence_order() {
    let (app, token) = app_with_founder();
    // emailLower matches come first, then raw email, username, display name.
    app.db.seed_user("z-email", json!({ "emailLower": "deniz" }));
    app.db.seed_user("a-display", json!({ "displayNameLower": "deniz" }));
    app.db.seed_user("m-username", json!({ "usernameLower": "deniz" }));

    let results = search(&app, &token, "Deniz").await;

    assert_eq!(uids(&results), vec!["z-email", "m-username", "a-display"]);
}

#[tokio::test]
async fn test_turkish_lowercasing_for_name_keys() {
    let (app, token) = app_with_founder();
    app.db.seed_user(
        "u1",
        json!({ "displayNameLower": "ışıl", "displayName": "IŞIL" }),
    );

    let results = search(&app, &token, "  IŞIL ").await;

    assert_eq!(uids(&results), vec!["u1"]);
}

#[tokio::test]
async fn test_raw_email_is_matched_exactly() {
    let (app, token) = app_with_founder();
    app.db.seed_user("u1", json!({ "email": "Mixed@Case.com" }));

    assert_eq!(uids(&search(&app, &token, "Mixed@Case.com").await), vec!["u1"]);
    assert!(search(&app, &token, "mixed@case.com").await.is_empty());
}

#[tokio::test]
async fn test_failing_query_is_skipped() {
    let (app, token) = app_with_founder();
    app.db.fail_queries_on(UserSearchField::EmailLower);
    app.db.seed_user("by-email", json!({ "emailLower": "can@mail.com" }));
    app.db.seed_user("by-raw", json!({ "email": "can@mail.com" }));

    let results = search(&app, &token, "can@mail.com").await;

    assert_eq!(uids(&results), vec!["by-raw"]);
}

#[tokio::test]
async fn test_each_query_is_capped() {
    let (app, token) = app_with_founder();
    for i in 0..15 {
        app.db
            .seed_user(&format!("u{i:02}"), json!({ "usernameLower": "usta" }));
    }

    let results = search(&app, &token, "usta").await;

    assert_eq!(results.len(), 10);
    assert_eq!(results[0]["uid"], "u00");
}

#[tokio::test]
async fn test_summary_fallbacks() {
    let (app, token) = app_with_founder();
    app.db.seed_user(
        "u1",
        json!({
            "usernameLower": "mehmet",
            "username": "mehmet",
            "role": "wizard",
            "supportAgent": true,
            "supportLevel": "boss",
        }),
    );
    app.db.seed_user(
        "u2",
        json!({ "usernameLower": "mehmet", "role": "admin", "supportLevel": "lead" }),
    );

    let results = search(&app, &token, "mehmet").await;

    assert_eq!(results[0]["display_name"], "mehmet");
    assert_eq!(results[0]["email"], "");
    assert_eq!(results[0]["role"], "user");
    assert_eq!(results[0]["support_agent"], true);
    assert_eq!(results[0]["support_level"], "agent");

    assert_eq!(results[1]["display_name"], "Kullanıcı");
    assert_eq!(results[1]["role"], "admin");
    assert_eq!(results[1]["support_agent"], false);
    assert_eq!(results[1]["support_level"], "lead");
}
