use std::time::Duration;

use axum::http::{Method, StatusCode};
use db::models::user;
use sea_orm::EntityTrait;
use serde_json::json;
use serial_test::serial;
use services::{
    AttendancePolicy,
    geofence::{GeoPoint, GeofencePolicy},
};
use tower::ServiceExt;

use crate::helpers::{
    body_json, create_slot, create_user, make_test_app, make_test_app_with_policy, request,
};

#[tokio::test]
#[serial]
async fn check_in_then_out_round_trip() {
    let t = make_test_app().await;
    let (member, token) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let check_in = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({
                "slot_id": slot.id,
                "client_timestamp": "2001-01-01T00:00:00Z",
                "location": {"lat": 28.6129, "lng": 77.2295}
            })),
        ))
        .await
        .unwrap();
    assert_eq!(check_in.status(), StatusCode::CREATED);
    let opened = body_json(check_in).await;
    assert_eq!(opened["data"]["user_id"], member.id);
    assert_eq!(opened["data"]["is_open"], true);
    assert_eq!(opened["data"]["slot_name"], "Morning");
    assert_eq!(opened["data"]["client_reported_at"], "2001-01-01T00:00:00+00:00");
    assert_ne!(opened["data"]["check_in_at"], "2001-01-01T00:00:00+00:00");

    let current = t
        .app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/attendance/current",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(current).await["data"]["id"], opened["data"]["id"]);

    let check_out = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-out",
            Some(&token),
            Some(json!({"action": "kiosk"})),
        ))
        .await
        .unwrap();
    assert_eq!(check_out.status(), StatusCode::OK);
    let closed = body_json(check_out).await;
    assert_eq!(closed["data"]["id"], opened["data"]["id"]);
    assert_eq!(closed["data"]["is_open"], false);
    assert_eq!(closed["data"]["check_out_action"], "kiosk");
    assert!(closed["data"]["check_out_at"].as_str().is_some());

    let history = t
        .app
        .oneshot(request(
            Method::GET,
            "/api/attendance/history",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    let history = body_json(history).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn user_id_in_body_is_ignored() {
    let t = make_test_app().await;
    let (member, token) = create_user(&t.db, "member@example.com", false).await;
    let (other, _) = create_user(&t.db, "other@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let response = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({"slot_id": slot.id, "user_id": other.id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["user_id"], member.id);
}

#[tokio::test]
#[serial]
async fn double_check_in_and_check_out_conflict() {
    let t = make_test_app().await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;
    let body = json!({"slot_id": slot.id});

    let first = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "already_checked_in");

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let out = t
            .app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/attendance/check-out",
                Some(&token),
                Some(json!({"action": "qr"})),
            ))
            .await
            .unwrap();
        assert_eq!(out.status(), expected);
        if expected == StatusCode::CONFLICT {
            assert_eq!(body_json(out).await["code"], "not_checked_in");
        }
    }
}

#[tokio::test]
#[serial]
async fn invalid_slots_are_rejected() {
    let t = make_test_app().await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;
    let inactive = create_slot(&t.db, "Closed", false).await;

    for body in [
        None,
        Some(json!({"slot_id": 4242})),
        Some(json!({"slot_id": inactive.id})),
    ] {
        let response = t
            .app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/attendance/check-in",
                Some(&token),
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "invalid_slot");
    }
}

#[tokio::test]
#[serial]
async fn malformed_body_and_bad_coordinates_are_bad_requests() {
    let t = make_test_app().await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let bad_coords = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({"slot_id": slot.id, "location": {"lat": 123.0, "lng": 0.0}})),
        ))
        .await
        .unwrap();
    assert_eq!(bad_coords.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(bad_coords).await["code"], "validation_failed");

    let wrong_type = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({"slot_id": "morning"})),
        ))
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(wrong_type).await["code"], "invalid_body");
}

#[tokio::test]
#[serial]
async fn geofence_policy_rejects_remote_check_ins() {
    let t = make_test_app_with_policy(AttendancePolicy {
        store_timeout: Duration::from_secs(5),
        default_slot_id: None,
        geofence: Some(GeofencePolicy {
            center: GeoPoint::new(28.6129, 77.2295),
            radius_m: 100.0,
        }),
    })
    .await;
    let (_, token) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let far = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({"slot_id": slot.id, "location": {"lat": 19.076, "lng": 72.8777}})),
        ))
        .await
        .unwrap();
    assert_eq!(far.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(far).await["code"], "outside_geofence");
}

#[tokio::test]
#[serial]
async fn members_see_only_their_own_history() {
    let t = make_test_app().await;
    let (member, member_token) = create_user(&t.db, "member@example.com", false).await;
    let (other, _) = create_user(&t.db, "other@example.com", false).await;
    let (_, admin_token) = create_user(&t.db, "admin@example.com", true).await;

    let forbidden = t
        .app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/attendance/history/{}", other.id),
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(forbidden).await["code"], "forbidden");

    let own = t
        .app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/attendance/history/{}", member.id),
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);

    let as_admin = t
        .app
        .oneshot(request(
            Method::GET,
            &format!("/api/attendance/history/{}?page=1&per_page=10", other.id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(as_admin.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn live_roster_is_admin_only_and_lists_open_sessions() {
    let t = make_test_app().await;
    let (member, member_token) = create_user(&t.db, "member@example.com", false).await;
    let (_, admin_token) = create_user(&t.db, "admin@example.com", true).await;
    let slot = create_slot(&t.db, "Evening", true).await;

    t.app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&member_token),
            Some(json!({"slot_id": slot.id})),
        ))
        .await
        .unwrap();

    let denied = t
        .app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/attendance/live",
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let live = t
        .app
        .oneshot(request(
            Method::GET,
            "/api/attendance/live",
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(live.status(), StatusCode::OK);
    let live = body_json(live).await;
    let roster = live["data"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["user_id"], member.id);
    assert_eq!(roster[0]["email"], "member@example.com");
    assert_eq!(roster[0]["slot_name"], "Evening");
}

#[tokio::test]
#[serial]
async fn token_for_a_removed_account_is_unauthorized() {
    let t = make_test_app().await;
    let (member, token) = create_user(&t.db, "gone@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;
    user::Entity::delete_by_id(member.id)
        .exec(&t.db)
        .await
        .unwrap();

    let res = t
        .app
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({"slot_id": slot.id})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], "unauthorized");
}
