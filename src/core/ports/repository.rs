use crate::core::models::{
    common::Pagination,
    dashboard::StatusCount,
    event::{Event, EventStatus, Insert as EventInsert, Query as EventQuery, Update as EventUpdate},
    feedback::{Feedback, Insert as FeedbackInsert},
    registration::{Insert as RegistrationInsert, Query as RegistrationQuery, Registration, RegistrationStatus},
    suggestion::{Comment, CommentInsert, Insert as SuggestionInsert, Query as SuggestionQuery, Suggestion, SuggestionStatus},
    user::{Insert as UserInsert, Patch as UserPatch, Query as UserQuery, Role, User},
    vote::{Insert as VoteInsert, Vote, VoteType},
};
use crate::error::Error;

pub trait UserCommon {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<User, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn exists_email(&mut self, email: &str) -> Result<bool, Error>;
    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error>;
    async fn set_role(&mut self, id: i32, role: Role) -> Result<(), Error>;
    async fn set_active(&mut self, id: i32, active: bool) -> Result<(), Error>;
    async fn query(&mut self, query: &UserQuery, pagination: Pagination) -> Result<Vec<User>, Error>;
    async fn count(&mut self, query: &UserQuery) -> Result<i64, Error>;
}

pub trait EventCommon {
    async fn insert(&mut self, event: EventInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Event, Error>;
    /// Reads the event and locks its row until the surrounding transaction ends.
    async fn get_for_update(&mut self, id: i32) -> Result<Event, Error>;
    async fn update(&mut self, id: i32, event: EventUpdate) -> Result<(), Error>;
    async fn set_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn query(&mut self, query: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error>;
    async fn count(&mut self, query: &EventQuery) -> Result<i64, Error>;
    async fn adjust_participants(&mut self, id: i32, delta: i32) -> Result<(), Error>;
    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error>;
    /// Recomputes every participant counter from the registrations, returns the number of rows fixed.
    async fn reconcile_participants(&mut self) -> Result<u64, Error>;
}

pub trait RegistrationCommon {
    async fn insert(&mut self, registration: RegistrationInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Registration, Error>;
    async fn find(&mut self, user_id: i32, event_id: i32) -> Result<Option<Registration>, Error>;
    async fn set_status(&mut self, id: i32, status: RegistrationStatus) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn query(&mut self, query: &RegistrationQuery, pagination: Pagination) -> Result<Vec<Registration>, Error>;
    async fn count(&mut self, query: &RegistrationQuery) -> Result<i64, Error>;
}

pub trait SuggestionCommon {
    async fn insert(&mut self, suggestion: SuggestionInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Suggestion, Error>;
    /// Reads the suggestion and locks its row until the surrounding transaction ends.
    async fn get_for_update(&mut self, id: i32) -> Result<Suggestion, Error>;
    async fn set_status(&mut self, id: i32, status: SuggestionStatus) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn query(&mut self, query: &SuggestionQuery, pagination: Pagination) -> Result<Vec<Suggestion>, Error>;
    async fn count(&mut self, query: &SuggestionQuery) -> Result<i64, Error>;
    async fn adjust_votes(&mut self, id: i32, vote_type: VoteType, delta: i32) -> Result<(), Error>;
    async fn insert_comment(&mut self, comment: CommentInsert) -> Result<i32, Error>;
    async fn comments(&mut self, suggestion_id: i32) -> Result<Vec<Comment>, Error>;
    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error>;
    /// Recomputes every vote counter from the vote ledger, returns the number of rows fixed.
    async fn reconcile_votes(&mut self) -> Result<u64, Error>;
}

pub trait VoteCommon {
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error>;
    async fn find(&mut self, user_id: i32, suggestion_id: i32) -> Result<Option<Vote>, Error>;
    async fn update_type(&mut self, id: i32, vote_type: VoteType) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn query_by_user(&mut self, user_id: i32, suggestion_ids: &[i32]) -> Result<Vec<Vote>, Error>;
}

pub trait FeedbackCommon {
    async fn insert(&mut self, feedback: FeedbackInsert) -> Result<i32, Error>;
    async fn query_by_event(&mut self, event_id: i32) -> Result<Vec<Feedback>, Error>;
    async fn count(&mut self) -> Result<i64, Error>;
}

pub trait Common: UserCommon + EventCommon + RegistrationCommon + SuggestionCommon + VoteCommon + FeedbackCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
}
