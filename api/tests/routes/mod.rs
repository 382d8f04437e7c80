mod attendance_test;
mod auth_test;
mod health_test;
mod slots_test;
mod users_test;
