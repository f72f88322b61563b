use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::event::Event;
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
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
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = Error;
    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            location: row.location,
            category: row.category,
            max_participants: row.max_participants,
            current_participants: row.current_participants,
            registration_deadline: row.registration_deadline,
            organizer_id: row.organizer_id,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}
