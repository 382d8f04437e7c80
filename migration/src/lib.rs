mod migrations;
mod migrator;

pub use migrator::Migrator;

/// Name of the partial unique index that allows at most one open attendance
/// session per user. Referenced by tests that simulate legacy data.
pub const OPEN_SESSION_INDEX: &str = "ux_attendance_open_per_user";
