use actix_web::web::{Json, Path, Query};
use actix_web::HttpResponse;

use crate::context::UserInfo;
use crate::core::models::registration::{Registration, RegistrationCreate, RegistrationStatus};
use crate::core::services::registration;
use crate::error::Error;
use crate::handlers::{Privilege, DB};
use crate::request::{Pagination, StatusUpdate};
use crate::response::List;

pub async fn register(user_info: UserInfo, Json(body): Json<RegistrationCreate>, db: DB, guard: Privilege) -> Result<Json<Registration>, Error> {
    let registration = registration::register_for_event(db.begin().await?, guard.get_ref(), user_info.id, body).await?;
    Ok(Json(registration))
}

pub async fn mine(user_info: UserInfo, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<Registration>>, Error> {
    let (list, total) = registration::my_registrations(&mut db.acquire().await?, user_info.id, page.try_into()?).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn set_status(
    user_info: UserInfo,
    registration_id: Path<i32>,
    Json(body): Json<StatusUpdate<RegistrationStatus>>,
    db: DB,
    guard: Privilege,
) -> Result<Json<Registration>, Error> {
    let registration = registration::update_registration_status(db.begin().await?, guard.get_ref(), user_info.id, registration_id.into_inner(), body.status).await?;
    Ok(Json(registration))
}

pub async fn cancel(user_info: UserInfo, registration_id: Path<i32>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    registration::cancel_registration(db.begin().await?, guard.get_ref(), user_info.id, registration_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
