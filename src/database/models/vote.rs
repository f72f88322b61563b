use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::vote::Vote;
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct VoteRow {
    pub id: i32,
    pub user_id: i32,
    pub suggestion_id: i32,
    pub vote_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = Error;
    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            id: row.id,
            user_id: row.user_id,
            suggestion_id: row.suggestion_id,
            vote_type: row.vote_type.parse()?,
            created_at: row.created_at,
        })
    }
}
