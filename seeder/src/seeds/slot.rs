use crate::seed::Seeder;
use db::models::slot::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct SlotSeeder;

const SLOTS: [(&str, &str, &str, i32); 3] = [
    ("Morning Slot", "09:00", "13:00", 40),
    ("Afternoon Slot", "13:00", "17:00", 40),
    ("Evening Slot", "17:00", "21:00", 30),
];

#[async_trait::async_trait]
impl Seeder for SlotSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        if !Model::list(db).await?.is_empty() {
            return Ok(());
        }
        for (name, start, end, capacity) in SLOTS {
            Model::create(db, name, start, end, capacity, true).await?;
        }
        Ok(())
    }
}
