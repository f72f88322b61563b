use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::user::User;
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;
    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            salt: row.salt,
            age: row.age,
            barangay: row.barangay,
            city: row.city,
            province: row.province,
            role: row.role.parse()?,
            is_active: row.is_active,
            is_verified: row.is_verified,
            created_at: row.created_at,
        })
    }
}
