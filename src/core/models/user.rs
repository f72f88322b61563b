use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Youth,
    SkOfficial,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Youth => "youth",
            Role::SkOfficial => "sk_official",
            Role::Admin => "admin",
        }
    }

    /// Admins and SK officials manage events and registrations.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::SkOfficial | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youth" => Ok(Role::Youth),
            "sk_official" => Ok(Role::SkOfficial),
            "admin" => Ok(Role::Admin),
            _ => Err(Error::Validation(format!("unknown role: {}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// The publicly visible part of a user.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Profile {
            id: u.id,
            name: u.name,
            email: u.email,
            age: u.age,
            barangay: u.barangay,
            city: u.city,
            province: u.province,
            role: u.role,
            is_active: u.is_active,
            is_verified: u.is_verified,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct Patch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub role_eq: Option<Role>,
    pub is_active_eq: Option<bool>,
}

/// JWT payload; `user` carries the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl crate::core::ports::tokener::Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}
