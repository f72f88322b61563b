use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    #[serde(alias = "confirmed")]
    Approved,
    Rejected,
    Cancelled,
    Attended,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Attended => "attended",
        }
    }

    /// Every status except `cancelled` holds a seat on the event.
    pub fn holds_seat(&self) -> bool {
        !matches!(self, RegistrationStatus::Cancelled)
    }

    /// Change to the event's participant counter when moving from `self` to `to`.
    pub fn seat_delta(&self, to: RegistrationStatus) -> i32 {
        match (self.holds_seat(), to.holds_seat()) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" | "confirmed" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            "attended" => Ok(RegistrationStatus::Attended),
            _ => Err(Error::Validation(format!("unknown registration status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: i32,
    pub user_id: i32,
    pub event_id: i32,
    pub status: RegistrationStatus,
    pub contact_number: String,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationCreate {
    pub event_id: i32,
    pub contact_number: String,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: i32,
    pub event_id: i32,
    pub status: RegistrationStatus,
    pub contact_number: String,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Query {
    pub user_id_eq: Option<i32>,
    pub event_id_eq: Option<i32>,
    pub status_eq: Option<RegistrationStatus>,
}
