use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub users_total: i64,
    pub users_active: i64,
    pub events_by_status: Vec<StatusCount>,
    pub registrations_total: i64,
    pub suggestions_by_status: Vec<StatusCount>,
    pub feedback_total: i64,
}

/// Rows corrected by a counter reconciliation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Reconciled {
    pub events: u64,
    pub suggestions: u64,
}
