//! In-process implementation of the repository ports used by the service tests.
//!
//! A transaction owns the whole state behind a `tokio::sync::Mutex` until it is
//! committed or dropped, which serializes writers the same way the row locks do
//! in PostgreSQL. Work happens on a copy that only replaces the shared state on
//! commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::models::{
    common::Pagination,
    dashboard::StatusCount,
    event::{Event, EventStatus, Insert as EventInsert, Query as EventQuery, Update as EventUpdate},
    feedback::{Feedback, Insert as FeedbackInsert},
    registration::{Insert as RegistrationInsert, Query as RegistrationQuery, Registration, RegistrationStatus},
    suggestion::{Comment, CommentInsert, Counters, Insert as SuggestionInsert, Query as SuggestionQuery, Suggestion, SuggestionStatus},
    user::{Insert as UserInsert, Patch as UserPatch, Query as UserQuery, Role, User},
    vote::{Insert as VoteInsert, Vote, VoteType},
};
use crate::core::ports::repository::{Common, EventCommon, FeedbackCommon, RegistrationCommon, Store, SuggestionCommon, TxStore, UserCommon, VoteCommon};
use crate::core::services::user::hash_password;
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct State {
    pub users: BTreeMap<i32, User>,
    pub events: BTreeMap<i32, Event>,
    pub registrations: BTreeMap<i32, Registration>,
    pub suggestions: BTreeMap<i32, Suggestion>,
    pub comments: BTreeMap<i32, Comment>,
    pub votes: BTreeMap<i32, Vote>,
    pub feedback: BTreeMap<i32, Feedback>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

fn page<T: Clone>(items: Vec<T>, pagination: Pagination) -> Vec<T> {
    items.into_iter().skip(pagination.offset as usize).take(pagination.limit as usize).collect()
}

fn status_counts<'a>(statuses: impl Iterator<Item = &'a str>) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for s in statuses {
        *counts.entry(s).or_default() += 1;
    }
    counts.into_iter().map(|(status, count)| StatusCount { status: status.into(), count }).collect()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// A connection whose every call is applied immediately.
    pub fn db(&self) -> MemoryConn {
        MemoryConn {
            inner: Conn::Db(self.state.clone()),
        }
    }

    /// A transaction holding the store exclusively until commit or drop.
    ///
    /// Concurrent tests on this store only exercise service logic under full
    /// serialization; the row level `FOR UPDATE` locking of the PostgreSQL
    /// store is not covered by them.
    pub async fn tx(&self) -> MemoryConn {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        MemoryConn {
            inner: Conn::Tx { guard, work },
        }
    }

    pub fn snapshot(&self) -> State {
        self.state.try_lock().expect("store is locked by a transaction").clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.try_lock().expect("store is locked by a transaction");
        f(&mut *state)
    }

    pub fn seed_user(&self, email: &str, role: Role) -> i32 {
        self.with_state(|s| {
            let id = s.next_id();
            s.users.insert(
                id,
                User {
                    id,
                    name: email.split('@').next().unwrap_or(email).into(),
                    email: email.into(),
                    password: hash_password("secret123", "salt"),
                    salt: "salt".into(),
                    age: Some(20),
                    barangay: None,
                    city: None,
                    province: None,
                    role,
                    is_active: true,
                    is_verified: true,
                    created_at: Utc::now(),
                },
            );
            id
        })
    }

    pub fn seed_event(&self, organizer_id: i32, max_participants: Option<i32>) -> i32 {
        self.with_state(|s| {
            let id = s.next_id();
            s.events.insert(
                id,
                Event {
                    id,
                    title: format!("event {}", id),
                    description: String::new(),
                    starts_at: Utc::now() + Duration::days(7),
                    ends_at: None,
                    location: "Barangay hall".into(),
                    category: "community".into(),
                    max_participants,
                    current_participants: 0,
                    registration_deadline: None,
                    organizer_id,
                    status: EventStatus::Upcoming,
                    created_at: Utc::now(),
                },
            );
            id
        })
    }

    pub fn seed_suggestion(&self, user_id: i32) -> i32 {
        self.with_state(|s| {
            let id = s.next_id();
            s.suggestions.insert(
                id,
                Suggestion {
                    id,
                    user_id,
                    title: format!("suggestion {}", id),
                    description: "more basketball courts".into(),
                    category: "sports".into(),
                    status: SuggestionStatus::Pending,
                    votes: Counters::default(),
                    created_at: Utc::now(),
                },
            );
            id
        })
    }
}

#[derive(Debug)]
enum Conn {
    Db(Arc<Mutex<State>>),
    Tx { guard: OwnedMutexGuard<State>, work: State },
}

#[derive(Debug)]
pub struct MemoryConn {
    inner: Conn,
}

impl MemoryConn {
    async fn with<R>(&mut self, f: impl FnOnce(&mut State) -> R) -> R {
        match &mut self.inner {
            Conn::Db(state) => {
                let mut state = state.lock().await;
                f(&mut *state)
            }
            Conn::Tx { work, .. } => f(work),
        }
    }
}

impl UserCommon for MemoryConn {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.users.values().any(|u| u.email == user.email) {
                return Err(Error::Conflict("email already registered".into()));
            }
            let id = s.next_id();
            s.users.insert(
                id,
                User {
                    id,
                    name: user.name,
                    email: user.email,
                    password: user.password,
                    salt: user.salt,
                    age: user.age,
                    barangay: user.barangay,
                    city: user.city,
                    province: user.province,
                    role: user.role,
                    is_active: true,
                    is_verified: false,
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        })
        .await
    }

    async fn get(&mut self, id: i32) -> Result<User, Error> {
        self.with(|s| s.users.get(&id).cloned().ok_or_else(|| Error::NotFound(format!("user {}", id)))).await
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.with(|s| s.users.values().find(|u| u.email == email).cloned()).await)
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        Ok(self.with(|s| s.users.values().any(|u| u.email == email)).await)
    }

    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error> {
        self.with(|s| {
            let u = s.users.get_mut(&id).ok_or_else(|| Error::NotFound(format!("user {}", id)))?;
            if let Some(name) = patch.name {
                u.name = name;
            }
            if patch.age.is_some() {
                u.age = patch.age;
            }
            if patch.barangay.is_some() {
                u.barangay = patch.barangay;
            }
            if patch.city.is_some() {
                u.city = patch.city;
            }
            if patch.province.is_some() {
                u.province = patch.province;
            }
            Ok(())
        })
        .await
    }

    async fn set_role(&mut self, id: i32, role: Role) -> Result<(), Error> {
        self.with(|s| {
            let u = s.users.get_mut(&id).ok_or_else(|| Error::NotFound(format!("user {}", id)))?;
            u.role = role;
            Ok(())
        })
        .await
    }

    async fn set_active(&mut self, id: i32, active: bool) -> Result<(), Error> {
        self.with(|s| {
            let u = s.users.get_mut(&id).ok_or_else(|| Error::NotFound(format!("user {}", id)))?;
            u.is_active = active;
            Ok(())
        })
        .await
    }

    async fn query(&mut self, query: &UserQuery, pagination: Pagination) -> Result<Vec<User>, Error> {
        let users = self
            .with(|s| {
                s.users
                    .values()
                    .filter(|u| query.role_eq.map_or(true, |r| u.role == r))
                    .filter(|u| query.is_active_eq.map_or(true, |a| u.is_active == a))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(page(users, pagination))
    }

    async fn count(&mut self, query: &UserQuery) -> Result<i64, Error> {
        let users = UserCommon::query(self, query, Pagination::new(i64::MAX, 0)).await?;
        Ok(users.len() as i64)
    }
}

impl EventCommon for MemoryConn {
    async fn insert(&mut self, event: EventInsert) -> Result<i32, Error> {
        Ok(self
            .with(|s| {
                let id = s.next_id();
                s.events.insert(
                    id,
                    Event {
                        id,
                        title: event.title,
                        description: event.description,
                        starts_at: event.starts_at,
                        ends_at: event.ends_at,
                        location: event.location,
                        category: event.category,
                        max_participants: event.max_participants,
                        current_participants: 0,
                        registration_deadline: event.registration_deadline,
                        organizer_id: event.organizer_id,
                        status: EventStatus::Upcoming,
                        created_at: Utc::now(),
                    },
                );
                id
            })
            .await)
    }

    async fn get(&mut self, id: i32) -> Result<Event, Error> {
        self.with(|s| s.events.get(&id).cloned().ok_or_else(|| Error::NotFound(format!("event {}", id)))).await
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Event, Error> {
        EventCommon::get(self, id).await
    }

    async fn update(&mut self, id: i32, event: EventUpdate) -> Result<(), Error> {
        self.with(|s| {
            let e = s.events.get_mut(&id).ok_or_else(|| Error::NotFound(format!("event {}", id)))?;
            e.title = event.title;
            e.description = event.description;
            e.starts_at = event.starts_at;
            e.ends_at = event.ends_at;
            e.location = event.location;
            e.category = event.category;
            e.max_participants = event.max_participants;
            e.registration_deadline = event.registration_deadline;
            Ok(())
        })
        .await
    }

    async fn set_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error> {
        self.with(|s| {
            let e = s.events.get_mut(&id).ok_or_else(|| Error::NotFound(format!("event {}", id)))?;
            e.status = status;
            Ok(())
        })
        .await
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|s| {
            s.events.remove(&id);
            s.registrations.retain(|_, r| r.event_id != id);
            s.feedback.retain(|_, f| f.event_id != id);
        })
        .await;
        Ok(())
    }

    async fn query(&mut self, query: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error> {
        let events = self
            .with(|s| {
                let mut events: Vec<Event> = s
                    .events
                    .values()
                    .filter(|e| query.status_eq.map_or(true, |st| e.status == st))
                    .filter(|e| query.category_eq.as_ref().map_or(true, |c| &e.category == c))
                    .cloned()
                    .collect();
                events.sort_by_key(|e| e.starts_at);
                events
            })
            .await;
        Ok(page(events, pagination))
    }

    async fn count(&mut self, query: &EventQuery) -> Result<i64, Error> {
        Ok(EventCommon::query(self, query, Pagination::new(i64::MAX, 0)).await?.len() as i64)
    }

    async fn adjust_participants(&mut self, id: i32, delta: i32) -> Result<(), Error> {
        self.with(|s| {
            let e = s.events.get_mut(&id).ok_or_else(|| Error::NotFound(format!("event {}", id)))?;
            if e.current_participants + delta < 0 {
                return Err(Error::ServerError(format!("participant counter of event {} would become negative", id)));
            }
            e.current_participants += delta;
            Ok(())
        })
        .await
    }

    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error> {
        Ok(self.with(|s| status_counts(s.events.values().map(|e| e.status.as_str()))).await)
    }

    async fn reconcile_participants(&mut self) -> Result<u64, Error> {
        Ok(self
            .with(|s| {
                let mut fixed = 0;
                for e in s.events.values_mut() {
                    let seats = s.registrations.values().filter(|r| r.event_id == e.id && r.status.holds_seat()).count() as i32;
                    if e.current_participants != seats {
                        e.current_participants = seats;
                        fixed += 1;
                    }
                }
                fixed
            })
            .await)
    }
}

impl RegistrationCommon for MemoryConn {
    async fn insert(&mut self, registration: RegistrationInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.registrations.values().any(|r| r.user_id == registration.user_id && r.event_id == registration.event_id) {
                return Err(Error::Conflict("duplicate registration".into()));
            }
            let id = s.next_id();
            s.registrations.insert(
                id,
                Registration {
                    id,
                    user_id: registration.user_id,
                    event_id: registration.event_id,
                    status: registration.status,
                    contact_number: registration.contact_number,
                    emergency_contact: registration.emergency_contact,
                    notes: registration.notes,
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        })
        .await
    }

    async fn get(&mut self, id: i32) -> Result<Registration, Error> {
        self.with(|s| s.registrations.get(&id).cloned().ok_or_else(|| Error::NotFound(format!("registration {}", id)))).await
    }

    async fn find(&mut self, user_id: i32, event_id: i32) -> Result<Option<Registration>, Error> {
        Ok(self.with(|s| s.registrations.values().find(|r| r.user_id == user_id && r.event_id == event_id).cloned()).await)
    }

    async fn set_status(&mut self, id: i32, status: RegistrationStatus) -> Result<(), Error> {
        self.with(|s| {
            let r = s.registrations.get_mut(&id).ok_or_else(|| Error::NotFound(format!("registration {}", id)))?;
            r.status = status;
            Ok(())
        })
        .await
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|s| s.registrations.remove(&id)).await;
        Ok(())
    }

    async fn query(&mut self, query: &RegistrationQuery, pagination: Pagination) -> Result<Vec<Registration>, Error> {
        let list = self
            .with(|s| {
                s.registrations
                    .values()
                    .filter(|r| query.user_id_eq.map_or(true, |u| r.user_id == u))
                    .filter(|r| query.event_id_eq.map_or(true, |e| r.event_id == e))
                    .filter(|r| query.status_eq.map_or(true, |st| r.status == st))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(page(list, pagination))
    }

    async fn count(&mut self, query: &RegistrationQuery) -> Result<i64, Error> {
        Ok(RegistrationCommon::query(self, query, Pagination::new(i64::MAX, 0)).await?.len() as i64)
    }
}

impl SuggestionCommon for MemoryConn {
    async fn insert(&mut self, suggestion: SuggestionInsert) -> Result<i32, Error> {
        Ok(self
            .with(|s| {
                let id = s.next_id();
                s.suggestions.insert(
                    id,
                    Suggestion {
                        id,
                        user_id: suggestion.user_id,
                        title: suggestion.title,
                        description: suggestion.description,
                        category: suggestion.category,
                        status: SuggestionStatus::Pending,
                        votes: Counters::default(),
                        created_at: Utc::now(),
                    },
                );
                id
            })
            .await)
    }

    async fn get(&mut self, id: i32) -> Result<Suggestion, Error> {
        self.with(|s| s.suggestions.get(&id).cloned().ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))).await
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Suggestion, Error> {
        SuggestionCommon::get(self, id).await
    }

    async fn set_status(&mut self, id: i32, status: SuggestionStatus) -> Result<(), Error> {
        self.with(|s| {
            let sg = s.suggestions.get_mut(&id).ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?;
            sg.status = status;
            Ok(())
        })
        .await
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|s| {
            s.suggestions.remove(&id);
            s.votes.retain(|_, v| v.suggestion_id != id);
            s.comments.retain(|_, c| c.suggestion_id != id);
        })
        .await;
        Ok(())
    }

    async fn query(&mut self, query: &SuggestionQuery, pagination: Pagination) -> Result<Vec<Suggestion>, Error> {
        let list = self
            .with(|s| {
                s.suggestions
                    .values()
                    .rev()
                    .filter(|sg| query.status_eq.map_or(true, |st| sg.status == st))
                    .filter(|sg| query.category_eq.as_ref().map_or(true, |c| &sg.category == c))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(page(list, pagination))
    }

    async fn count(&mut self, query: &SuggestionQuery) -> Result<i64, Error> {
        Ok(SuggestionCommon::query(self, query, Pagination::new(i64::MAX, 0)).await?.len() as i64)
    }

    async fn adjust_votes(&mut self, id: i32, vote_type: VoteType, delta: i32) -> Result<(), Error> {
        self.with(|s| {
            let sg = s.suggestions.get_mut(&id).ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?;
            sg.votes.adjust(vote_type, delta);
            if sg.votes.upvotes < 0 || sg.votes.downvotes < 0 {
                return Err(Error::ServerError(format!("vote counter of suggestion {} would become negative", id)));
            }
            Ok(())
        })
        .await
    }

    async fn insert_comment(&mut self, comment: CommentInsert) -> Result<i32, Error> {
        Ok(self
            .with(|s| {
                let id = s.next_id();
                s.comments.insert(
                    id,
                    Comment {
                        id,
                        suggestion_id: comment.suggestion_id,
                        user_id: comment.user_id,
                        content: comment.content,
                        created_at: Utc::now(),
                    },
                );
                id
            })
            .await)
    }

    async fn comments(&mut self, suggestion_id: i32) -> Result<Vec<Comment>, Error> {
        Ok(self.with(|s| s.comments.values().filter(|c| c.suggestion_id == suggestion_id).cloned().collect()).await)
    }

    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error> {
        Ok(self.with(|s| status_counts(s.suggestions.values().map(|sg| sg.status.as_str()))).await)
    }

    async fn reconcile_votes(&mut self) -> Result<u64, Error> {
        Ok(self
            .with(|s| {
                let mut fixed = 0;
                for sg in s.suggestions.values_mut() {
                    let mut counted = Counters::default();
                    for v in s.votes.values().filter(|v| v.suggestion_id == sg.id) {
                        counted.adjust(v.vote_type, 1);
                    }
                    if sg.votes != counted {
                        sg.votes = counted;
                        fixed += 1;
                    }
                }
                fixed
            })
            .await)
    }
}

impl VoteCommon for MemoryConn {
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.votes.values().any(|v| v.user_id == vote.user_id && v.suggestion_id == vote.suggestion_id) {
                return Err(Error::Conflict("duplicate vote".into()));
            }
            let id = s.next_id();
            s.votes.insert(
                id,
                Vote {
                    id,
                    user_id: vote.user_id,
                    suggestion_id: vote.suggestion_id,
                    vote_type: vote.vote_type,
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        })
        .await
    }

    async fn find(&mut self, user_id: i32, suggestion_id: i32) -> Result<Option<Vote>, Error> {
        Ok(self.with(|s| s.votes.values().find(|v| v.user_id == user_id && v.suggestion_id == suggestion_id).cloned()).await)
    }

    async fn update_type(&mut self, id: i32, vote_type: VoteType) -> Result<(), Error> {
        self.with(|s| {
            let v = s.votes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("vote {}", id)))?;
            v.vote_type = vote_type;
            Ok(())
        })
        .await
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|s| s.votes.remove(&id)).await;
        Ok(())
    }

    async fn query_by_user(&mut self, user_id: i32, suggestion_ids: &[i32]) -> Result<Vec<Vote>, Error> {
        Ok(self
            .with(|s| {
                s.votes
                    .values()
                    .filter(|v| v.user_id == user_id && suggestion_ids.contains(&v.suggestion_id))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl FeedbackCommon for MemoryConn {
    async fn insert(&mut self, feedback: FeedbackInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.feedback.values().any(|f| f.user_id == feedback.user_id && f.event_id == feedback.event_id) {
                return Err(Error::Conflict("feedback already submitted".into()));
            }
            let id = s.next_id();
            s.feedback.insert(
                id,
                Feedback {
                    id,
                    user_id: feedback.user_id,
                    event_id: feedback.event_id,
                    rating: feedback.rating,
                    comment: feedback.comment,
                    created_at: Utc::now(),
                },
            );
            Ok(id)
        })
        .await
    }

    async fn query_by_event(&mut self, event_id: i32) -> Result<Vec<Feedback>, Error> {
        Ok(self.with(|s| s.feedback.values().filter(|f| f.event_id == event_id).cloned().collect()).await)
    }

    async fn count(&mut self) -> Result<i64, Error> {
        Ok(self.with(|s| s.feedback.len() as i64).await)
    }
}

impl Common for MemoryConn {}
impl Store for MemoryConn {}

impl TxStore for MemoryConn {
    async fn commit(self) -> Result<(), Error> {
        if let Conn::Tx { mut guard, work } = self.inner {
            *guard = work;
        }
        Ok(())
    }
}
