use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::suggestion::Counters;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            _ => Err(Error::Validation(format!("unknown vote type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vote {
    pub id: i32,
    pub user_id: i32,
    pub suggestion_id: i32,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: i32,
    pub suggestion_id: i32,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteCast {
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub votes: Counters,
    pub my_vote: Option<VoteType>,
}
