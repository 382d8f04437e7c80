use serde::{Deserialize, Serialize};
use services::Requester;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller identity handed to services. Never taken from request bodies.
    pub fn requester(&self) -> Requester {
        Requester::new(self.0.sub, self.0.admin)
    }
}
