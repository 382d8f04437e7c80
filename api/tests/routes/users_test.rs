use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use crate::helpers::{body_json, create_user, make_test_app, request};

#[tokio::test]
#[serial]
async fn user_directory_is_admin_only() {
    let t = make_test_app().await;
    let (_, member) = create_user(&t.db, "member@example.com", false).await;
    let (_, admin) = create_user(&t.db, "admin@example.com", true).await;

    let denied = t
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/users", Some(&member), None))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(denied).await["code"], "forbidden");

    let listed = t
        .app
        .oneshot(request(Method::GET, "/api/users", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let users = body_json(listed).await;
    let users = users["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
#[serial]
async fn members_edit_their_own_profile() {
    let t = make_test_app().await;
    let (member, token) = create_user(&t.db, "member@example.com", false).await;

    let updated = t
        .app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/api/users/profile",
            Some(&token),
            Some(json!({"name": "Mira Das", "phone": "+91 98765 43210", "address": "12 Park Street"})),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    assert_eq!(body["data"]["id"], member.id);
    assert_eq!(body["data"]["name"], "Mira Das");
    assert_eq!(body["data"]["phone"], "+91 98765 43210");
    assert_eq!(body["data"]["email"], "member@example.com");

    let cleared = t
        .app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/api/users/profile",
            Some(&token),
            Some(json!({"phone": ""})),
        ))
        .await
        .unwrap();
    let body = body_json(cleared).await;
    assert!(body["data"]["phone"].is_null());
    assert_eq!(body["data"]["address"], "12 Park Street");

    let fetched = t
        .app
        .oneshot(request(Method::GET, "/api/users/profile", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await["data"]["name"], "Mira Das");
}

#[tokio::test]
#[serial]
async fn profile_update_validates_and_requires_a_token() {
    let t = make_test_app().await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;

    let short = t
        .app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/api/users/profile",
            Some(&token),
            Some(json!({"password": "short"})),
        ))
        .await
        .unwrap();
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(short).await["code"], "validation_failed");

    let anonymous = t
        .app
        .oneshot(request(
            Method::PUT,
            "/api/users/profile",
            None,
            Some(json!({"name": "Nobody"})),
        ))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}
