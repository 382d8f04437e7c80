pub mod app;
pub mod ws;

pub use app::{
    TestApp, body_json, create_slot, create_user, make_test_app, make_test_app_with_policy,
    request,
};
pub use ws::{connect_ws, next_event, spawn_server};
