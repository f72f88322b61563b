use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::suggestion::{Counters, Suggestion};
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct SuggestionRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SuggestionRow> for Suggestion {
    type Error = Error;
    fn try_from(row: SuggestionRow) -> Result<Self, Self::Error> {
        Ok(Suggestion {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            category: row.category,
            status: row.status.parse()?,
            votes: Counters::new(row.upvotes, row.downvotes),
            created_at: row.created_at,
        })
    }
}
