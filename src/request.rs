use serde::Deserialize;

use crate::core::models::common;
use crate::core::models::event::{self, EventStatus};
use crate::core::models::registration::RegistrationStatus;
use crate::core::models::suggestion::{self, SuggestionStatus};
use crate::core::models::user::{self, Role};
use crate::error::Error;

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

impl TryFrom<Pagination> for common::Pagination {
    type Error = Error;
    fn try_from(p: Pagination) -> Result<Self, Self::Error> {
        common::Pagination::from_page(p.page, p.size)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl From<UserFilter> for user::Query {
    fn from(f: UserFilter) -> Self {
        user::Query {
            role_eq: f.role,
            is_active_eq: f.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub category: Option<String>,
}

impl From<EventFilter> for event::Query {
    fn from(f: EventFilter) -> Self {
        event::Query {
            status_eq: f.status,
            category_eq: f.category,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionFilter {
    pub status: Option<SuggestionStatus>,
    pub category: Option<String>,
}

impl From<SuggestionFilter> for suggestion::Query {
    fn from(f: SuggestionFilter) -> Self {
        suggestion::Query {
            status_eq: f.status,
            category_eq: f.category,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrationFilter {
    pub status: Option<RegistrationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ActiveUpdate {
    pub is_active: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        let p: common::Pagination = p.try_into().unwrap();
        assert_eq!(p, common::Pagination::new(20, 0));
        let p: Pagination = serde_json::from_str(r#"{"page": 0, "size": 5}"#).unwrap();
        assert!(common::Pagination::try_from(p).is_err());
    }
}
