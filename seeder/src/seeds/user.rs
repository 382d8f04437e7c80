use crate::seed::Seeder;
use db::models::user::Model;
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

async fn ensure(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    admin: bool,
) -> Result<(), DbErr> {
    if Model::find_by_email(db, email).await?.is_none() {
        Model::create(db, name, email, "password123", admin).await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        ensure(db, "Front Desk", "admin@libraflow.local", true).await?;
        ensure(db, "Sample Member", "member@libraflow.local", false).await?;

        for _ in 0..8 {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            ensure(db, &name, &email, false).await?;
        }
        Ok(())
    }
}
