use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The verified caller of an operation. Only ever built from a validated token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: i64, admin: bool) -> Self {
        let role = if admin { Role::Admin } else { Role::User };
        Self { user_id, role }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may read anyone's records; everyone else only their own.
    pub fn can_view(&self, user_id: i64) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}
