use db::models::user::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub role: Role,
    pub campus_id: i64,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
