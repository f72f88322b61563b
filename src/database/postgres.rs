use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

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
use crate::core::ports::repository::{Common, EventCommon, FeedbackCommon, RegistrationCommon, Store, SuggestionCommon, TxStore, UserCommon, VoteCommon};
use crate::database::models::{event::EventRow, registration::RegistrationRow, suggestion::SuggestionRow, user::UserRow, vote::VoteRow};
use crate::error::Error;

static UNIQUE_VIOLATION: &str = "23505";

/// Turns a unique index violation into a conflict, everything else stays a database error.
fn conflict_on_unique(err: sqlx::Error, what: &str) -> Error {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return Error::Conflict(format!("{} already exists", what));
        }
    }
    Error::DatabaseError(err)
}

fn convert<R, T>(rows: Vec<R>) -> Result<Vec<T>, Error>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        query_scalar(
            "INSERT INTO users (name, email, password, salt, age, barangay, city, province, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password)
        .bind(user.salt)
        .bind(user.age)
        .bind(user.barangay)
        .bind(user.city)
        .bind(user.province)
        .bind(user.role.as_str())
        .fetch_one(&mut self.executor)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))
    }

    async fn get(&mut self, id: i32) -> Result<User, Error> {
        let row: Option<UserRow> = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        row.ok_or_else(|| Error::NotFound(format!("user {}", id)))?.try_into()
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let row: Option<UserRow> = query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut self.executor).await?;
        row.map(User::try_from).transpose()
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error> {
        query(
            "UPDATE users SET
                name = COALESCE($1, name),
                age = COALESCE($2, age),
                barangay = COALESCE($3, barangay),
                city = COALESCE($4, city),
                province = COALESCE($5, province)
            WHERE id = $6",
        )
        .bind(patch.name)
        .bind(patch.age)
        .bind(patch.barangay)
        .bind(patch.city)
        .bind(patch.province)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn set_role(&mut self, id: i32, role: Role) -> Result<(), Error> {
        query("UPDATE users SET role = $1 WHERE id = $2").bind(role.as_str()).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn set_active(&mut self, id: i32, active: bool) -> Result<(), Error> {
        query("UPDATE users SET is_active = $1 WHERE id = $2").bind(active).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &UserQuery, pagination: Pagination) -> Result<Vec<User>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM users WHERE 1 = 1");
        if let Some(role) = query.role_eq {
            stmt.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(active) = query.is_active_eq {
            stmt.push(" AND is_active = ").push_bind(active);
        }
        stmt.push(" ORDER BY id LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let rows: Vec<UserRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert(rows)
    }

    async fn count(&mut self, query: &UserQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1 = 1");
        if let Some(role) = query.role_eq {
            stmt.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(active) = query.is_active_eq {
            stmt.push(" AND is_active = ").push_bind(active);
        }
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl<E> EventCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, event: EventInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO events (title, description, starts_at, ends_at, location, category, max_participants, registration_deadline, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id",
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.location)
        .bind(event.category)
        .bind(event.max_participants)
        .bind(event.registration_deadline)
        .bind(event.organizer_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Event, Error> {
        let row: Option<EventRow> = query_as("SELECT * FROM events WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        row.ok_or_else(|| Error::NotFound(format!("event {}", id)))?.try_into()
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Event, Error> {
        let row: Option<EventRow> = query_as("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.ok_or_else(|| Error::NotFound(format!("event {}", id)))?.try_into()
    }

    async fn update(&mut self, id: i32, event: EventUpdate) -> Result<(), Error> {
        query(
            "UPDATE events SET
                title = $1,
                description = $2,
                starts_at = $3,
                ends_at = $4,
                location = $5,
                category = $6,
                max_participants = $7,
                registration_deadline = $8
            WHERE id = $9",
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.location)
        .bind(event.category)
        .bind(event.max_participants)
        .bind(event.registration_deadline)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn set_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error> {
        query("UPDATE events SET status = $1 WHERE id = $2").bind(status.as_str()).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &EventQuery, pagination: Pagination) -> Result<Vec<Event>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM events WHERE 1 = 1");
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = &query.category_eq {
            stmt.push(" AND category = ").push_bind(category.clone());
        }
        stmt.push(" ORDER BY starts_at LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let rows: Vec<EventRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert(rows)
    }

    async fn count(&mut self, query: &EventQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM events WHERE 1 = 1");
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = &query.category_eq {
            stmt.push(" AND category = ").push_bind(category.clone());
        }
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn adjust_participants(&mut self, id: i32, delta: i32) -> Result<(), Error> {
        query("UPDATE events SET current_participants = current_participants + $1 WHERE id = $2")
            .bind(delta)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error> {
        let counts = query_as("SELECT status, COUNT(*) AS count FROM events GROUP BY status ORDER BY status")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }

    async fn reconcile_participants(&mut self) -> Result<u64, Error> {
        let res = query(
            "
        WITH counted AS (
            SELECT e.id, (COUNT(r.id) FILTER (WHERE r.status <> 'cancelled'))::INTEGER AS seats
            FROM events AS e
            LEFT JOIN registrations AS r ON r.event_id = e.id
            GROUP BY e.id
        )
        UPDATE events SET current_participants = counted.seats
        FROM counted
        WHERE events.id = counted.id AND events.current_participants <> counted.seats",
        )
        .execute(&mut self.executor)
        .await?;
        Ok(res.rows_affected())
    }
}

impl<E> RegistrationCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, registration: RegistrationInsert) -> Result<i32, Error> {
        query_scalar(
            "INSERT INTO registrations (user_id, event_id, status, contact_number, emergency_contact, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(registration.user_id)
        .bind(registration.event_id)
        .bind(registration.status.as_str())
        .bind(registration.contact_number)
        .bind(registration.emergency_contact)
        .bind(registration.notes)
        .fetch_one(&mut self.executor)
        .await
        .map_err(|e| conflict_on_unique(e, "registration"))
    }

    async fn get(&mut self, id: i32) -> Result<Registration, Error> {
        let row: Option<RegistrationRow> = query_as("SELECT * FROM registrations WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        row.ok_or_else(|| Error::NotFound(format!("registration {}", id)))?.try_into()
    }

    async fn find(&mut self, user_id: i32, event_id: i32) -> Result<Option<Registration>, Error> {
        let row: Option<RegistrationRow> = query_as("SELECT * FROM registrations WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(Registration::try_from).transpose()
    }

    async fn set_status(&mut self, id: i32, status: RegistrationStatus) -> Result<(), Error> {
        query("UPDATE registrations SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM registrations WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &RegistrationQuery, pagination: Pagination) -> Result<Vec<Registration>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM registrations WHERE 1 = 1");
        if let Some(uid) = query.user_id_eq {
            stmt.push(" AND user_id = ").push_bind(uid);
        }
        if let Some(eid) = query.event_id_eq {
            stmt.push(" AND event_id = ").push_bind(eid);
        }
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        stmt.push(" ORDER BY created_at DESC LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let rows: Vec<RegistrationRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert(rows)
    }

    async fn count(&mut self, query: &RegistrationQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM registrations WHERE 1 = 1");
        if let Some(uid) = query.user_id_eq {
            stmt.push(" AND user_id = ").push_bind(uid);
        }
        if let Some(eid) = query.event_id_eq {
            stmt.push(" AND event_id = ").push_bind(eid);
        }
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl<E> SuggestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, suggestion: SuggestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO suggestions (user_id, title, description, category) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(suggestion.user_id)
            .bind(suggestion.title)
            .bind(suggestion.description)
            .bind(suggestion.category)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Suggestion, Error> {
        let row: Option<SuggestionRow> = query_as("SELECT * FROM suggestions WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        row.ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?.try_into()
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Suggestion, Error> {
        let row: Option<SuggestionRow> = query_as("SELECT * FROM suggestions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?.try_into()
    }

    async fn set_status(&mut self, id: i32, status: SuggestionStatus) -> Result<(), Error> {
        query("UPDATE suggestions SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM suggestions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &SuggestionQuery, pagination: Pagination) -> Result<Vec<Suggestion>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM suggestions WHERE 1 = 1");
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = &query.category_eq {
            stmt.push(" AND category = ").push_bind(category.clone());
        }
        stmt.push(" ORDER BY created_at DESC LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let rows: Vec<SuggestionRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert(rows)
    }

    async fn count(&mut self, query: &SuggestionQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM suggestions WHERE 1 = 1");
        if let Some(status) = query.status_eq {
            stmt.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category) = &query.category_eq {
            stmt.push(" AND category = ").push_bind(category.clone());
        }
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn adjust_votes(&mut self, id: i32, vote_type: VoteType, delta: i32) -> Result<(), Error> {
        let stmt = match vote_type {
            VoteType::Upvote => "UPDATE suggestions SET upvotes = upvotes + $1 WHERE id = $2",
            VoteType::Downvote => "UPDATE suggestions SET downvotes = downvotes + $1 WHERE id = $2",
        };
        query(stmt).bind(delta).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn insert_comment(&mut self, comment: CommentInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO suggestion_comments (suggestion_id, user_id, content) VALUES ($1, $2, $3) RETURNING id")
            .bind(comment.suggestion_id)
            .bind(comment.user_id)
            .bind(comment.content)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn comments(&mut self, suggestion_id: i32) -> Result<Vec<Comment>, Error> {
        let comments = query_as("SELECT * FROM suggestion_comments WHERE suggestion_id = $1 ORDER BY created_at")
            .bind(suggestion_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(comments)
    }

    async fn count_by_status(&mut self) -> Result<Vec<StatusCount>, Error> {
        let counts = query_as("SELECT status, COUNT(*) AS count FROM suggestions GROUP BY status ORDER BY status")
            .fetch_all(&mut self.executor)
            .await?;
        Ok(counts)
    }

    async fn reconcile_votes(&mut self) -> Result<u64, Error> {
        let res = query(
            "
        WITH counted AS (
            SELECT
                s.id,
                (COUNT(v.id) FILTER (WHERE v.vote_type = 'upvote'))::INTEGER AS up,
                (COUNT(v.id) FILTER (WHERE v.vote_type = 'downvote'))::INTEGER AS down
            FROM suggestions AS s
            LEFT JOIN votes AS v ON v.suggestion_id = s.id
            GROUP BY s.id
        )
        UPDATE suggestions SET upvotes = counted.up, downvotes = counted.down
        FROM counted
        WHERE suggestions.id = counted.id
            AND (suggestions.upvotes <> counted.up OR suggestions.downvotes <> counted.down)",
        )
        .execute(&mut self.executor)
        .await?;
        Ok(res.rows_affected())
    }
}

impl<E> VoteCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error> {
        query_scalar("INSERT INTO votes (user_id, suggestion_id, vote_type) VALUES ($1, $2, $3) RETURNING id")
            .bind(vote.user_id)
            .bind(vote.suggestion_id)
            .bind(vote.vote_type.as_str())
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| conflict_on_unique(e, "vote"))
    }

    async fn find(&mut self, user_id: i32, suggestion_id: i32) -> Result<Option<Vote>, Error> {
        let row: Option<VoteRow> = query_as("SELECT * FROM votes WHERE user_id = $1 AND suggestion_id = $2")
            .bind(user_id)
            .bind(suggestion_id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(Vote::try_from).transpose()
    }

    async fn update_type(&mut self, id: i32, vote_type: VoteType) -> Result<(), Error> {
        query("UPDATE votes SET vote_type = $1 WHERE id = $2")
            .bind(vote_type.as_str())
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM votes WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query_by_user(&mut self, user_id: i32, suggestion_ids: &[i32]) -> Result<Vec<Vote>, Error> {
        let rows: Vec<VoteRow> = query_as("SELECT * FROM votes WHERE user_id = $1 AND suggestion_id = ANY($2)")
            .bind(user_id)
            .bind(suggestion_ids.to_vec())
            .fetch_all(&mut self.executor)
            .await?;
        convert(rows)
    }
}

impl<E> FeedbackCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, feedback: FeedbackInsert) -> Result<i32, Error> {
        query_scalar("INSERT INTO feedback (user_id, event_id, rating, comment) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(feedback.user_id)
            .bind(feedback.event_id)
            .bind(feedback.rating)
            .bind(feedback.comment)
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| conflict_on_unique(e, "feedback"))
    }

    async fn query_by_event(&mut self, event_id: i32) -> Result<Vec<Feedback>, Error> {
        let list = query_as("SELECT * FROM feedback WHERE event_id = $1 ORDER BY created_at DESC")
            .bind(event_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(list)
    }

    async fn count(&mut self) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM feedback").fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }
}
