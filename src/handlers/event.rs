use actix_web::web::{Json, Path, Query};
use actix_web::HttpResponse;

use crate::context::UserInfo;
use crate::core::models::event::{Event, EventCreate, EventStatus};
use crate::core::models::registration::Registration;
use crate::core::services::{event, registration};
use crate::error::Error;
use crate::handlers::{Privilege, DB};
use crate::request::{EventFilter, Pagination, RegistrationFilter, StatusUpdate};
use crate::response::{CreateResponse, List};

pub async fn create(user_info: UserInfo, Json(body): Json<EventCreate>, db: DB, guard: Privilege) -> Result<Json<CreateResponse>, Error> {
    let id = event::create_event(db.begin().await?, guard.get_ref(), user_info.id, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(user_info: UserInfo, Query(page): Query<Pagination>, Query(filter): Query<EventFilter>, db: DB, guard: Privilege) -> Result<Json<List<Event>>, Error> {
    let (list, total) = event::list_events(&mut db.acquire().await?, guard.get_ref(), user_info.id, filter.into(), page.try_into()?).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn detail(user_info: UserInfo, event_id: Path<i32>, db: DB, guard: Privilege) -> Result<Json<Event>, Error> {
    let event = event::event_detail(&mut db.acquire().await?, guard.get_ref(), user_info.id, event_id.into_inner()).await?;
    Ok(Json(event))
}

pub async fn update(user_info: UserInfo, event_id: Path<i32>, Json(body): Json<EventCreate>, db: DB, guard: Privilege) -> Result<Json<Event>, Error> {
    let event = event::update_event(db.begin().await?, guard.get_ref(), user_info.id, event_id.into_inner(), body).await?;
    Ok(Json(event))
}

pub async fn set_status(user_info: UserInfo, event_id: Path<i32>, Json(body): Json<StatusUpdate<EventStatus>>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    event::set_event_status(db.begin().await?, guard.get_ref(), user_info.id, event_id.into_inner(), body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(user_info: UserInfo, event_id: Path<i32>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    event::delete_event(db.begin().await?, guard.get_ref(), user_info.id, event_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn registrations(
    user_info: UserInfo,
    event_id: Path<i32>,
    Query(page): Query<Pagination>,
    Query(filter): Query<RegistrationFilter>,
    db: DB,
    guard: Privilege,
) -> Result<Json<List<Registration>>, Error> {
    let (list, total) = registration::event_registrations(&mut db.acquire().await?, guard.get_ref(), user_info.id, event_id.into_inner(), filter.status, page.try_into()?).await?;
    Ok(Json(List::new(list, total)))
}
