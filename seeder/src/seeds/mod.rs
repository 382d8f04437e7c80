pub mod attendance_session;
pub mod slot;
pub mod user;
