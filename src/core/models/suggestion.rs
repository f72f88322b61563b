use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::vote::VoteType;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Implemented,
}

impl SuggestionStatus {
    pub const ALL: [SuggestionStatus; 5] = [
        SuggestionStatus::Pending,
        SuggestionStatus::UnderReview,
        SuggestionStatus::Approved,
        SuggestionStatus::Rejected,
        SuggestionStatus::Implemented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::UnderReview => "under_review",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Implemented => "implemented",
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SuggestionStatus::Pending),
            "under_review" => Ok(SuggestionStatus::UnderReview),
            "approved" => Ok(SuggestionStatus::Approved),
            "rejected" => Ok(SuggestionStatus::Rejected),
            "implemented" => Ok(SuggestionStatus::Implemented),
            _ => Err(Error::Validation(format!("unknown suggestion status: {}", s))),
        }
    }
}

/// Aggregate vote counters kept on the suggestion row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl Counters {
    pub fn new(upvotes: i32, downvotes: i32) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn adjust(&mut self, vote_type: VoteType, delta: i32) {
        match vote_type {
            VoteType::Upvote => self.upvotes += delta,
            VoteType::Downvote => self.downvotes += delta,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: SuggestionStatus,
    pub votes: Counters,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionItem {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub my_vote: Option<VoteType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionDetail {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub my_vote: Option<VoteType>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionCreate {
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Default, Clone)]
pub struct Query {
    pub status_eq: Option<SuggestionStatus>,
    pub category_eq: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub suggestion_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreate {
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CommentInsert {
    pub suggestion_id: i32,
    pub user_id: i32,
    pub content: String,
}
