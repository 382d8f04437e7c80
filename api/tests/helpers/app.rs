use api::{auth::generate_jwt, build_app, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use db::models::{slot, user};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use services::AttendancePolicy;
use util::{config::AppConfig, ws::WebSocketManager};

pub const TEST_JWT_SECRET: &str = "libraflow-test-secret";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub db: DatabaseConnection,
}

pub async fn make_test_app() -> TestApp {
    make_test_app_with_policy(AttendancePolicy::default()).await
}

/// Fresh in-memory database, fresh WebSocket manager, shared JWT test secret.
pub async fn make_test_app_with_policy(policy: AttendancePolicy) -> TestApp {
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);
    AppConfig::set_jwt_duration_minutes(60u64);

    let db = setup_test_db().await;
    let state = AppState::new(db.clone(), WebSocketManager::new(), policy);
    TestApp {
        app: build_app(state.clone()),
        state,
        db,
    }
}

/// Inserts a user and returns it with a valid bearer token.
pub async fn create_user(db: &DatabaseConnection, email: &str, admin: bool) -> (user::Model, String) {
    let name = email.split('@').next().unwrap_or("user");
    let user = user::Model::create(db, name, email, "password123", admin)
        .await
        .expect("create user");
    let (token, _) = generate_jwt(user.id, user.admin).expect("sign token");
    (user, token)
}

pub async fn create_slot(db: &DatabaseConnection, name: &str, is_active: bool) -> slot::Model {
    slot::Model::create(db, name, "09:00", "13:00", 40, is_active)
        .await
        .expect("create slot")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
