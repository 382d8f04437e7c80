use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use tokio_tungstenite::tungstenite::Error as WsError;
use tower::ServiceExt;

use crate::helpers::{
    body_json, connect_ws, create_slot, create_user, make_test_app, next_event, request,
    spawn_server,
};

#[tokio::test]
#[serial]
async fn admin_gets_snapshot_then_roster_changes() {
    let t = make_test_app().await;
    let (_, admin) = create_user(&t.db, "admin@example.com", true).await;
    let (member, member_token) = create_user(&t.db, "member@example.com", false).await;
    let slot = create_slot(&t.db, "Morning", true).await;

    let addr = spawn_server(t.app.clone()).await;
    let (mut client, _) = connect_ws(&addr, "attendance/live", &admin).await.unwrap();

    let snapshot = next_event(&mut client).await;
    assert_eq!(snapshot["event"], "attendance.roster_snapshot");
    assert_eq!(snapshot["topic"], "attendance:live");
    assert_eq!(snapshot["payload"]["roster"], json!([]));

    let checked_in = t
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-in",
            Some(&member_token),
            Some(json!({"slot_id": slot.id})),
        ))
        .await
        .unwrap();
    assert_eq!(checked_in.status(), StatusCode::CREATED);
    let session_id = body_json(checked_in).await["data"]["id"].clone();

    let changed = next_event(&mut client).await;
    assert_eq!(changed["type"], "event");
    assert_eq!(changed["event"], "attendance.roster_changed");
    assert_eq!(changed["payload"]["kind"], "checked_in");
    assert_eq!(changed["payload"]["session_id"], session_id);
    assert_eq!(changed["payload"]["user_id"], member.id);
    assert_eq!(changed["payload"]["roster"][0]["name"], "member");

    t.app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/attendance/check-out",
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();

    let changed = next_event(&mut client).await;
    assert_eq!(changed["payload"]["kind"], "checked_out");
    assert_eq!(changed["payload"]["roster"], json!([]));
}

#[tokio::test]
#[serial]
async fn members_cannot_observe_the_live_roster() {
    let t = make_test_app().await;
    let (_, member) = create_user(&t.db, "member@example.com", false).await;

    let addr = spawn_server(t.app.clone()).await;
    match connect_ws(&addr, "attendance/live", &member).await {
        Err(WsError::Http(response)) => assert_eq!(response.status(), StatusCode::FORBIDDEN),
        other => panic!("expected 403 handshake rejection, got {:?}", other.map(|_| ())),
    }
}
