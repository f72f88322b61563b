use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::registration::Registration;
use crate::error::Error;

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: i32,
    pub user_id: i32,
    pub event_id: i32,
    pub status: String,
    pub contact_number: String,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = Error;
    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Registration {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            status: row.status.parse()?,
            contact_number: row.contact_number,
            emergency_contact: row.emergency_contact,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
