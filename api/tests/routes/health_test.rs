use axum::http::{Method, StatusCode};
use serial_test::serial;
use tower::ServiceExt;

use crate::helpers::{body_json, make_test_app, request};

#[tokio::test]
#[serial]
async fn health_check_returns_ok_json() {
    let t = make_test_app().await;

    let response = t
        .app
        .oneshot(request(Method::GET, "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
    assert_eq!(json["message"], "Health check passed");
}
