use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, QueryFilter, Set};
use serde::Serialize;

/// Represents a library member or administrator in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique, lower-cased email address used to log in.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Whether the user has admin privileges.
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    AttendanceSessions,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Emails are compared case-insensitively by storing them lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Self-service account changes. `None` leaves a field as it is; an empty
/// `phone` or `address` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl Model {
    /// Hash `password` and insert a new user.
    pub async fn create<C>(
        db: &C,
        name: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            name: Set(name.trim().to_owned()),
            email: Set(normalize_email(email)),
            password_hash: Set(Self::hash_password(password)?),
            admin: Set(admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active.insert(db).await
    }

    pub async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Email.eq(normalize_email(email)))
            .one(db)
            .await
    }

    /// Applies `changes` to user `id`. Returns `None` if the user does not exist.
    pub async fn update_profile<C>(
        db: &C,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(existing) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_owned());
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(blank_to_none(phone));
        }
        if let Some(address) = changes.address {
            active.address = Set(blank_to_none(address));
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(Self::hash_password(&password)?);
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await.map(Some)
    }

    /// Returns `true` if `password` matches the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_normalizes_email_and_hashes_password() {
        let db = setup_test_db().await;

        let user = Model::create(&db, " Asha ", "Asha@Library.org", "hunter22!", false)
            .await
            .unwrap();

        assert_eq!(user.name, "Asha");
        assert_eq!(user.email, "asha@library.org");
        assert_ne!(user.password_hash, "hunter22!");
        assert!(user.verify_password("hunter22!"));
        assert!(!user.verify_password("wrong"));

        let found = Model::find_by_email(&db, "ASHA@library.org").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let db = setup_test_db().await;
        let user = Model::create(&db, "Asha", "asha@library.org", "hunter22!", false)
            .await
            .unwrap();

        let updated = Model::update_profile(
            &db,
            user.id,
            ProfileChanges {
                phone: Some(" 98100 00000 ".into()),
                address: Some("12 Reading Lane".into()),
                password: Some("new-password".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Asha");
        assert_eq!(updated.phone.as_deref(), Some("98100 00000"));
        assert!(updated.verify_password("new-password"));
        assert!(!updated.verify_password("hunter22!"));

        let cleared = Model::update_profile(
            &db,
            user.id,
            ProfileChanges {
                address: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(cleared.address.is_none());
        assert_eq!(cleared.phone.as_deref(), Some("98100 00000"));

        let missing = Model::update_profile(&db, 9999, ProfileChanges::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_the_store() {
        let db = setup_test_db().await;
        Model::create(&db, "A", "dup@test.com", "password1", false)
            .await
            .unwrap();
        let dup = Model::create(&db, "B", "DUP@test.com", "password2", false).await;
        assert!(dup.is_err());
    }
}
