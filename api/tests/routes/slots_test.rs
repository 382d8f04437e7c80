use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use crate::helpers::{body_json, create_slot, create_user, make_test_app, request};

#[tokio::test]
#[serial]
async fn members_can_list_but_not_manage_slots() {
    let t = make_test_app().await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;
    create_slot(&t.db, "Morning", true).await;

    let list = t
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/slots", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    assert_eq!(body_json(list).await["data"].as_array().unwrap().len(), 1);

    let create = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/slots",
            Some(&token),
            Some(json!({"name": "Night", "start_time": "21:00", "end_time": "23:00", "capacity": 5})),
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn admin_manages_slot_lifecycle() {
    let t = make_test_app().await;
    let (_, admin) = create_user(&t.db, "admin@example.com", true).await;

    let created = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/slots",
            Some(&admin),
            Some(json!({"name": "Afternoon", "start_time": "13:00", "end_time": "17:00", "capacity": 30})),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["data"]["is_active"], true);
    let id = created["data"]["id"].as_i64().unwrap();

    let updated = t
        .app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/slots/{id}"),
            Some(&admin),
            Some(json!({"is_active": false})),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["data"]["is_active"], false);
    assert_eq!(updated["data"]["name"], "Afternoon");

    let deleted = t
        .app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/slots/{id}"),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = t
        .app
        .oneshot(request(
            Method::GET,
            &format!("/api/slots/{id}"),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn slot_validation_and_in_use_conflict() {
    let t = make_test_app().await;
    let (_, admin) = create_user(&t.db, "admin@example.com", true).await;
    let (_, member) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let bad = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/slots",
            Some(&admin),
            Some(json!({"name": "Bad", "start_time": "25:99", "end_time": "13:00", "capacity": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    t.app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&member),
            Some(json!({"slot_id": slot.id})),
        ))
        .await
        .unwrap();

    let in_use = t
        .app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/slots/{}", slot.id),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(in_use.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(in_use).await["code"], "slot_in_use");
}
