use db::models::user::{self, Model as User, ProfileChanges};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::error::{UserError, is_unique_violation};

pub struct UserService;

impl UserService {
    /// Self-registration. Always creates a non-admin member.
    pub async fn register(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        if User::find_by_email(db, email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        match User::create(db, name, email, password, false).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "user registered");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(UserError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let Some(user) = User::find_by_email(db, email).await? else {
            return Err(UserError::InvalidCredentials);
        };
        if !user.verify_password(password) {
            tracing::debug!(user_id = user.id, "password mismatch");
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn get(db: &DatabaseConnection, user_id: i64) -> Result<User, UserError> {
        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Updates the caller's own profile. Email and role are not editable here.
    pub async fn update_profile(
        db: &DatabaseConnection,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<User, UserError> {
        let password_changed = changes.password.is_some();
        let user = User::update_profile(db, user_id, changes)
            .await?
            .ok_or(UserError::NotFound)?;
        tracing::info!(user_id, password_changed, "profile updated");
        Ok(user)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<User>, UserError> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }
}
