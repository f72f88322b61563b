use actix_web::web::{Json, Path, Query};
use actix_web::HttpResponse;

use crate::context::UserInfo;
use crate::core::models::user::{Patch, Profile};
use crate::core::services::user;
use crate::error::Error;
use crate::handlers::{Privilege, DB};
use crate::request::{ActiveUpdate, Pagination, RoleUpdate, UserFilter};
use crate::response::List;

pub async fn me(user_info: UserInfo, db: DB) -> Result<Json<Profile>, Error> {
    let profile = user::me(&mut db.acquire().await?, user_info.id).await?;
    Ok(Json(profile))
}

pub async fn update_profile(user_info: UserInfo, Json(body): Json<Patch>, db: DB) -> Result<Json<Profile>, Error> {
    let profile = user::update_profile(db.begin().await?, user_info.id, body).await?;
    Ok(Json(profile))
}

pub async fn list(user_info: UserInfo, Query(page): Query<Pagination>, Query(filter): Query<UserFilter>, db: DB, guard: Privilege) -> Result<Json<List<Profile>>, Error> {
    let (list, total) = user::list_users(&mut db.acquire().await?, guard.get_ref(), user_info.id, filter.into(), page.try_into()?).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn set_role(user_info: UserInfo, target: Path<i32>, Json(body): Json<RoleUpdate>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    user::set_role(db.begin().await?, guard.get_ref(), user_info.id, target.into_inner(), body.role).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_active(user_info: UserInfo, target: Path<i32>, Json(body): Json<ActiveUpdate>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    user::set_active(db.begin().await?, guard.get_ref(), user_info.id, target.into_inner(), body.is_active).await?;
    Ok(HttpResponse::NoContent().finish())
}
