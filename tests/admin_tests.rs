// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin panel: role and support assignment, pro moderation.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn call(
    app: &common::TestApp,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(common::request(method, uri, Some(token), body))
        .await
        .unwrap();
    let status = response.status();
    (status, common::body_json(response).await)
}

fn founder_token() -> String {
    common::id_token("boss", Some(common::FOUNDER_EMAIL))
}

#[tokio::test]
async fn test_overview_for_founder() {
    let app = common::create_test_app();

    let (status, body) = call(&app, "GET", "/api/admin", &founder_token(), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "founder");
    assert_eq!(body["can_add_admin"], true);
    let modules = body["modules"].as_array().unwrap();
    assert!(modules.iter().all(|m| m["available"] == true));
}

#[tokio::test]
async fn test_assign_role_creates_missing_user() {
    let app = common::create_test_app();

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/users/new-mod/role",
        &founder_token(),
        Some(json!({ "role": "moderator" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], "new-mod");
    assert_eq!(body["role"], "moderator");

    let stored = app.db.raw("users", "new-mod").unwrap();
    assert_eq!(stored["role"], "moderator");
    assert_eq!(stored["accountType"], "user");
    assert!(stored["createdAt"].is_string());
    assert!(stored["updatedAt"].is_string());
}

#[tokio::test]
async fn test_assign_role_keeps_other_fields() {
    let app = common::create_test_app();
    app.db.seed_user(
        "u1",
        json!({ "role": "user", "accountType": "pro", "proId": "u1", "displayName": "Ali" }),
    );

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/users/u1/role",
        &founder_token(),
        Some(json!({ "role": "headmod" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Ali");
    let stored = app.db.raw("users", "u1").unwrap();
    assert_eq!(stored["role"], "headmod");
    assert_eq!(stored["accountType"], "pro");
    assert_eq!(stored["proId"], "u1");
}

#[tokio::test]
async fn test_founder_and_user_are_not_grantable() {
    let app = common::create_test_app();

    for role in ["founder", "user", "superadmin"] {
        let (status, _) = call(
            &app,
            "PUT",
            "/api/admin/users/u1/role",
            &founder_token(),
            Some(json!({ "role": role })),
        )
        .await;
        assert!(status.is_client_error(), "{role} should be rejected");
    }
    assert!(app.db.raw("users", "u1").is_none());
}

#[tokio::test]
async fn test_admin_cannot_assign_roles() {
    let app = common::create_test_app();
    app.db.seed_user("adm", json!({ "role": "admin" }));
    let token = common::id_token("adm", None);

    let (status, _) = call(
        &app,
        "PUT",
        "/api/admin/users/u1/role",
        &token,
        Some(json!({ "role": "admin" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.db.raw("users", "u1").is_none());
}

#[tokio::test]
async fn test_support_assignment() {
    let app = common::create_test_app();
    app.db.seed_user("u1", json!({ "role": "moderator" }));

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/users/u1/support",
        &founder_token(),
        Some(json!({ "support_agent": true, "support_level": "lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["support_agent"], true);
    assert_eq!(body["support_level"], "lead");
    let stored = app.db.raw("users", "u1").unwrap();
    assert_eq!(stored["supportLevel"], "lead");
    assert!(stored["supportUpdatedAt"].is_string());

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/users/u1/support",
        &founder_token(),
        Some(json!({ "support_agent": false, "support_level": "lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["support_agent"], false);
    assert_eq!(body["support_level"], "agent");
    let stored = app.db.raw("users", "u1").unwrap();
    assert_eq!(stored["supportLevel"], Value::Null);
    assert_eq!(stored["role"], "moderator");
}

#[tokio::test]
async fn test_moderator_can_moderate_pros() {
    let app = common::create_test_app();
    app.db.seed_user("mod", json!({ "role": "moderator" }));
    app.db.seed_pro(
        "p1",
        json!({ "ownerUid": "o", "isVisible": true, "isSponsored": false, "cities": ["İzmir"], "professions": ["Fayans"] }),
    );
    let token = common::id_token("mod", None);

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/pros/p1/visibility",
        &token,
        Some(json!({ "is_visible": true, "is_sponsored": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_sponsored"], true);

    let (status, body) = call(
        &app,
        "DELETE",
        "/api/admin/pros/p1",
        &token,
        Some(json!({ "admin_note": "  sahte profil " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_deleted"], true);
    assert_eq!(body["is_visible"], false);

    let stored = app.db.raw("pros", "p1").unwrap();
    assert_eq!(stored["deletedBy"], "mod");
    assert_eq!(stored["adminNote"], "sahte profil");
    assert!(stored["deletedAt"].is_string());
    assert_eq!(stored["ownerUid"], "o");

    // Soft-deleted pros drop out of discovery.
    let viewer = common::id_token("viewer", None);
    let (_, body) = call(&app, "GET", "/api/discover?category=fayans&city=35", &viewer, None).await;
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_republishing_does_not_undo_soft_delete() {
    let app = common::create_test_app();
    app.db.seed_user("mod", json!({ "role": "moderator" }));
    let moderator = common::id_token("mod", None);
    let owner = common::id_token("owner", Some("owner@mail.com"));
    let profile = json!({
        "company_name": "Ege Yapı",
        "display_name": "Mert Usta",
        "professions": ["Fayans"],
        "cities": ["İzmir"],
    });

    let (status, _) = call(&app, "POST", "/api/pros", &owner, Some(profile.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(&app, "DELETE", "/api/admin/pros/owner", &moderator, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "POST", "/api/pros", &owner, Some(profile)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_visible"], false);

    let stored = app.db.raw("pros", "owner").unwrap();
    assert_eq!(stored["isDeleted"], true);
    assert_eq!(stored["isVisible"], false);

    let (_, body) = call(&app, "GET", "/api/discover?category=fayans&city=35", &owner, None).await;
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_soft_delete_without_body() {
    let app = common::create_test_app();
    app.db.seed_pro("p1", json!({ "isVisible": true }));

    let (status, body) = call(&app, "DELETE", "/api/admin/pros/p1", &founder_token(), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_deleted"], true);
    assert!(app.db.raw("pros", "p1").unwrap().get("adminNote").is_none());
}

#[tokio::test]
async fn test_moderation_of_missing_pro() {
    let app = common::create_test_app();

    let (status, _) = call(
        &app,
        "PUT",
        "/api/admin/pros/nope/visibility",
        &founder_token(),
        Some(json!({ "is_visible": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.db.raw("pros", "nope").is_none());
}
