use crate::core::models::common::Pagination;
use crate::core::models::event::{Event, EventCreate, EventStatus, Insert as EventInsert, Query, Update};
use crate::core::models::user::User;
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{EventCommon, Store, TxStore};
use crate::core::services::user::{authorize, caller};
use crate::error::Error;

fn ensure_organizer<G>(guard: &G, user: &User, event: &Event) -> Result<(), Error>
where
    G: Guard,
{
    if event.organizer_id == user.id || guard.allows(user.role, "event", "manage_any")? {
        return Ok(());
    }
    Err(Error::Forbidden(format!("user {} does not manage event {}", user.id, event.id)))
}

pub async fn create_event<T, G>(mut tx: T, guard: &G, uid: i32, data: EventCreate) -> Result<i32, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "event", "create").await?;
    data.validate()?;
    let id = EventCommon::insert(
        &mut tx,
        EventInsert {
            title: data.title,
            description: data.description,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            location: data.location,
            category: data.category,
            max_participants: data.max_participants,
            registration_deadline: data.registration_deadline,
            organizer_id: uid,
        },
    )
    .await?;
    tx.commit().await?;
    log::info!("user {} created event {}", uid, id);
    Ok(id)
}

pub async fn event_detail<S, G>(db: &mut S, guard: &G, uid: i32, id: i32) -> Result<Event, Error>
where
    S: Store,
    G: Guard,
{
    authorize(db, guard, uid, "event", "read").await?;
    EventCommon::get(db, id).await
}

pub async fn list_events<S, G>(db: &mut S, guard: &G, uid: i32, query: Query, pagination: Pagination) -> Result<(Vec<Event>, i64), Error>
where
    S: Store,
    G: Guard,
{
    authorize(db, guard, uid, "event", "read").await?;
    let total = EventCommon::count(db, &query).await?;
    let events = EventCommon::query(db, &query, pagination).await?;
    Ok((events, total))
}

pub async fn update_event<T, G>(mut tx: T, guard: &G, uid: i32, id: i32, data: EventCreate) -> Result<Event, Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let event = EventCommon::get_for_update(&mut tx, id).await?;
    ensure_organizer(guard, &user, &event)?;
    data.validate()?;
    if let Some(max) = data.max_participants {
        if max < event.current_participants {
            return Err(Error::Validation(format!(
                "max_participants {} is below the {} current participants",
                max, event.current_participants
            )));
        }
    }
    EventCommon::update(&mut tx, id, Update::from(data)).await?;
    let event = EventCommon::get(&mut tx, id).await?;
    tx.commit().await?;
    Ok(event)
}

pub async fn set_event_status<T, G>(mut tx: T, guard: &G, uid: i32, id: i32, status: EventStatus) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let event = EventCommon::get_for_update(&mut tx, id).await?;
    ensure_organizer(guard, &user, &event)?;
    EventCommon::set_status(&mut tx, id, status).await?;
    tx.commit().await?;
    log::info!("event {} moved from {} to {}", id, event.status, status);
    Ok(())
}

pub async fn delete_event<T, G>(mut tx: T, guard: &G, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let event = EventCommon::get_for_update(&mut tx, id).await?;
    ensure_organizer(guard, &user, &event)?;
    EventCommon::delete(&mut tx, id).await?;
    tx.commit().await?;
    log::info!("user {} deleted event {}", uid, id);
    Ok(())
}
