pub mod attendance_anomaly;
pub mod attendance_session;
pub mod slot;
pub mod user;

pub use attendance_anomaly::Entity as AttendanceAnomaly;
pub use attendance_session::Entity as AttendanceSession;
pub use slot::Entity as Slot;
pub use user::Entity as User;
