use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance_session::AttendanceSessionSeeder, slot::SlotSeeder, user::UserSeeder,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::process::ExitCode;
use util::config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let db = match db::connect(&config::database_path()).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Could not open database: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Migration failed: {e}");
        return ExitCode::FAILURE;
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(SlotSeeder), "Slot"),
        (Box::new(AttendanceSessionSeeder), "AttendanceSession"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
    ExitCode::SUCCESS
}
