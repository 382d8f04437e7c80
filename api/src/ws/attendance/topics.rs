/// Topic carrying every roster change. One per deployment.
pub fn attendance_live_topic() -> String {
    "attendance:live".to_owned()
}
