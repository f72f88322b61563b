use chrono::Utc;

use crate::core::models::common::Pagination;
use crate::core::models::event::Event;
use crate::core::models::registration::{Insert as RegistrationInsert, Query, Registration, RegistrationCreate, RegistrationStatus};
use crate::core::models::user::User;
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{EventCommon, RegistrationCommon, Store, TxStore};
use crate::core::services::user::{authorize, caller};
use crate::error::Error;

/// Organizers manage their own events' registrations, staff roles manage all of them.
fn can_manage<G>(guard: &G, user: &User, event: &Event) -> Result<bool, Error>
where
    G: Guard,
{
    if event.organizer_id == user.id {
        return Ok(true);
    }
    guard.allows(user.role, "registration", "manage")
}

pub async fn register_for_event<T, G>(mut tx: T, guard: &G, uid: i32, data: RegistrationCreate) -> Result<Registration, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "registration", "create").await?;
    if data.contact_number.trim().is_empty() {
        return Err(Error::Validation("contact_number is required".into()));
    }
    let event = EventCommon::get_for_update(&mut tx, data.event_id).await?;
    if RegistrationCommon::find(&mut tx, uid, event.id).await?.is_some() {
        return Err(Error::Conflict(format!("already registered for event {}", event.id)));
    }
    if let Some(reason) = event.closed_reason(Utc::now()) {
        log::warn!("user {} refused for event {}: {}", uid, event.id, reason);
        return Err(Error::Capacity(reason));
    }
    let id = RegistrationCommon::insert(
        &mut tx,
        RegistrationInsert {
            user_id: uid,
            event_id: event.id,
            status: RegistrationStatus::Pending,
            contact_number: data.contact_number,
            emergency_contact: data.emergency_contact,
            notes: data.notes,
        },
    )
    .await?;
    EventCommon::adjust_participants(&mut tx, event.id, 1).await?;
    let registration = RegistrationCommon::get(&mut tx, id).await?;
    tx.commit().await?;
    log::info!("user {} registered for event {} ({}/{:?})", uid, event.id, event.current_participants + 1, event.max_participants);
    Ok(registration)
}

pub async fn update_registration_status<T, G>(mut tx: T, guard: &G, uid: i32, id: i32, status: RegistrationStatus) -> Result<Registration, Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let registration = RegistrationCommon::get(&mut tx, id).await?;
    let event = EventCommon::get_for_update(&mut tx, registration.event_id).await?;
    // re-read under the event lock
    let registration = RegistrationCommon::get(&mut tx, registration.id).await?;
    if !can_manage(guard, &user, &event)? {
        if registration.user_id != user.id {
            return Err(Error::Forbidden("not allowed to update this registration".into()));
        }
        if status != RegistrationStatus::Cancelled {
            return Err(Error::Forbidden("registrants may only cancel".into()));
        }
    }
    let delta = registration.status.seat_delta(status);
    if delta > 0 && event.is_full() {
        return Err(Error::Capacity("event is full".into()));
    }
    RegistrationCommon::set_status(&mut tx, id, status).await?;
    if delta != 0 {
        EventCommon::adjust_participants(&mut tx, event.id, delta).await?;
    }
    let registration = RegistrationCommon::get(&mut tx, id).await?;
    tx.commit().await?;
    log::info!("registration {} set to {} by user {}", id, status, uid);
    Ok(registration)
}

pub async fn cancel_registration<T, G>(mut tx: T, guard: &G, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let registration = RegistrationCommon::get(&mut tx, id).await?;
    let event = EventCommon::get_for_update(&mut tx, registration.event_id).await?;
    let registration = RegistrationCommon::get(&mut tx, registration.id).await?;
    if registration.user_id != user.id && !can_manage(guard, &user, &event)? {
        return Err(Error::Forbidden("not allowed to cancel this registration".into()));
    }
    RegistrationCommon::delete(&mut tx, id).await?;
    if registration.status.holds_seat() {
        EventCommon::adjust_participants(&mut tx, event.id, -1).await?;
    }
    tx.commit().await?;
    log::info!("registration {} for event {} removed by user {}", id, event.id, uid);
    Ok(())
}

pub async fn my_registrations<S>(db: &mut S, uid: i32, pagination: Pagination) -> Result<(Vec<Registration>, i64), Error>
where
    S: Store,
{
    caller(db, uid).await?;
    let query = Query {
        user_id_eq: Some(uid),
        ..default::default()
    };
    let total = RegistrationCommon::count(db, &query).await?;
    let list = RegistrationCommon::query(db, &query, pagination).await?;
    Ok((list, total))
}

pub async fn event_registrations<S, G>(db: &mut S, guard: &G, uid: i32, event_id: i32, status: Option<RegistrationStatus>, pagination: Pagination) -> Result<(Vec<Registration>, i64), Error>
where
    S: Store,
    G: Guard,
{
    let user = caller(db, uid).await?;
    let event = EventCommon::get(db, event_id).await?;
    if !can_manage(guard, &user, &event)? {
        return Err(Error::Forbidden("not allowed to view registrations of this event".into()));
    }
    let query = Query {
        event_id_eq: Some(event_id),
        status_eq: status,
        ..default::default()
    };
    let total = RegistrationCommon::count(db, &query).await?;
    let list = RegistrationCommon::query(db, &query, pagination).await?;
    Ok((list, total))
}
