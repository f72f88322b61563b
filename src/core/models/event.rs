use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [EventStatus::Upcoming, EventStatus::Ongoing, EventStatus::Completed, EventStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            _ => Err(Error::Validation(format!("unknown event status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub organizer_id: i32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        match self.max_participants {
            Some(max) => self.current_participants >= max,
            None => false,
        }
    }

    /// Returns why the event no longer accepts registrations, if it does not.
    pub fn closed_reason(&self, now: DateTime<Utc>) -> Option<String> {
        if matches!(self.status, EventStatus::Cancelled | EventStatus::Completed) {
            return Some(format!("event is {}", self.status));
        }
        if let Some(deadline) = self.registration_deadline {
            if deadline < now {
                return Some("registration deadline has passed".into());
            }
        }
        if self.is_full() {
            return Some("event is full".into());
        }
        None
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl EventCreate {
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(Error::Validation("location is required".into()));
        }
        if let Some(max) = self.max_participants {
            if max < 1 {
                return Err(Error::Validation("max_participants must be positive".into()));
            }
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(Error::Validation("event ends before it starts".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub organizer_id: i32,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: String,
    pub category: String,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

impl From<EventCreate> for Update {
    fn from(e: EventCreate) -> Self {
        Update {
            title: e.title,
            description: e.description,
            starts_at: e.starts_at,
            ends_at: e.ends_at,
            location: e.location,
            category: e.category,
            max_participants: e.max_participants,
            registration_deadline: e.registration_deadline,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Query {
    pub status_eq: Option<EventStatus>,
    pub category_eq: Option<String>,
}
