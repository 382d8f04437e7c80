use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use crate::helpers::{body_json, create_user, make_test_app, request};

#[tokio::test]
#[serial]
async fn register_creates_member_and_returns_token() {
    let t = make_test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Asha", "email": "Asha@Example.com", "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "asha@example.com");
    assert_eq!(json["data"]["admin"], false);
    let token = json["data"]["token"].as_str().unwrap().to_owned();

    let me = t
        .app
        .oneshot(request(Method::GET, "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["name"], "Asha");
    assert!(me["data"].get("password_hash").is_none());
}

#[tokio::test]
#[serial]
async fn register_rejects_bad_input_and_duplicates() {
    let t = make_test_app().await;
    create_user(&t.db, "taken@example.com", false).await;

    let short = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "A", "email": "a@example.com", "password": "short"})),
        ))
        .await
        .unwrap();
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let short = body_json(short).await;
    assert_eq!(short["message"], "Password must be at least 8 characters");

    let dup = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "B", "email": "TAKEN@example.com", "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(dup).await["code"], "email_taken");
}

#[tokio::test]
#[serial]
async fn login_checks_credentials() {
    let t = make_test_app().await;
    create_user(&t.db, "reader@example.com", false).await;

    let ok = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "reader@example.com", "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(body_json(ok).await["data"]["token"].as_str().is_some());

    let bad = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "reader@example.com", "password": "wrong-password"})),
        ))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(bad).await["code"], "unauthorized");
}

#[tokio::test]
#[serial]
async fn protected_routes_reject_missing_and_forged_tokens() {
    let t = make_test_app().await;

    let missing = t
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/auth/me", None, None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let forged = t
        .app
        .oneshot(request(
            Method::GET,
            "/api/attendance/history",
            Some("not.a.jwt"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(forged).await["code"], "unauthorized");
}
