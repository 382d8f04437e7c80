pub mod m202510190001_create_users;
pub mod m202510190002_create_slots;
pub mod m202510190003_create_attendance_sessions;
pub mod m202510190004_create_attendance_anomalies;
