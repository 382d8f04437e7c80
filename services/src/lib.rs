pub mod attendance_session;
pub mod error;
pub mod geofence;
pub mod identity;
pub mod roster;
pub mod slot_service;
pub mod user_service;

pub use attendance_session::{AttendancePolicy, AttendanceService};
pub use error::{AttendanceError, SlotError, UserError};
pub use identity::{Requester, Role};
