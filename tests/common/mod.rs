// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use repairoo_api::config::Config;
use repairoo_api::db::{FirestoreDb, MemoryDb};
use repairoo_api::routes::create_router;
use repairoo_api::services::{Catalog, FirebaseTokenVerifier, MemoryBlobStore, RoleService};
use repairoo_api::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_KID: &str = "test-kid";
pub const TEST_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_private.pem");
pub const TEST_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_public.pem");
/// A key the verifier does not trust.
#[allow(dead_code)]
pub const OTHER_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/other_rsa_private.pem");

/// Founder allow-listed in `Config::test_default()`.
#[allow(dead_code)]
pub const FOUNDER_EMAIL: &str = "founder@repairoo.test";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Router plus handles on the in-memory backends behind it.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: Arc<MemoryDb>,
    pub blobs: Arc<MemoryBlobStore>,
}

/// Create a test app over in-memory stores and a static-key verifier.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> TestApp {
    let db = Arc::new(MemoryDb::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let token_verifier = FirebaseTokenVerifier::new_with_static_key(
        &config,
        TEST_KID,
        DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY).expect("test public key"),
    )
    .expect("static verifier");

    let state = Arc::new(AppState {
        roles: RoleService::new(&config.founder_emails),
        catalog: Catalog::builtin().expect("builtin catalog"),
        config,
        db: db.clone(),
        blobs: blobs.clone(),
        token_verifier: Arc::new(token_verifier),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
        blobs,
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Claims of a fresh, valid ID token for the test project.
#[allow(dead_code)]
pub fn id_token_claims(uid: &str, email: Option<&str>) -> Value {
    let now = now_secs();
    let mut claims = json!({
        "iss": "https://securetoken.google.com/test-project",
        "aud": "test-project",
        "sub": uid,
        "user_id": uid,
        "iat": now,
        "auth_time": now,
        "exp": now + 3600,
        "name": "Test Kullanıcı",
    });
    if let Some(email) = email {
        claims["email"] = json!(email);
    }
    claims
}

/// Sign arbitrary claims with a key and kid.
#[allow(dead_code)]
pub fn sign_token(claims: &Value, private_key: &[u8], kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(private_key).expect("test private key"),
    )
    .expect("sign test token")
}

/// A valid ID token for `uid`.
#[allow(dead_code)]
pub fn id_token(uid: &str, email: Option<&str>) -> String {
    sign_token(&id_token_claims(uid, email), TEST_PRIVATE_KEY, TEST_KID)
}

/// Request builder with a Bearer token and optional JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Parse a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
