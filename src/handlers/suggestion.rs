use actix_web::web::{Json, Path, Query};
use actix_web::HttpResponse;

use crate::context::UserInfo;
use crate::core::models::suggestion::{CommentCreate, SuggestionCreate, SuggestionDetail, SuggestionItem, SuggestionStatus};
use crate::core::models::vote::{VoteCast, VoteOutcome};
use crate::core::services::{suggestion, vote};
use crate::error::Error;
use crate::handlers::{Privilege, DB};
use crate::request::{Pagination, StatusUpdate, SuggestionFilter};
use crate::response::{CreateResponse, List};

pub async fn create(user_info: UserInfo, Json(body): Json<SuggestionCreate>, db: DB, guard: Privilege) -> Result<Json<CreateResponse>, Error> {
    let id = suggestion::create_suggestion(db.begin().await?, guard.get_ref(), user_info.id, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(user_info: UserInfo, Query(page): Query<Pagination>, Query(filter): Query<SuggestionFilter>, db: DB) -> Result<Json<List<SuggestionItem>>, Error> {
    let (list, total) = suggestion::list_suggestions(&mut db.acquire().await?, user_info.id, filter.into(), page.try_into()?).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn detail(user_info: UserInfo, suggestion_id: Path<i32>, db: DB) -> Result<Json<SuggestionDetail>, Error> {
    let detail = suggestion::suggestion_detail(&mut db.acquire().await?, user_info.id, suggestion_id.into_inner()).await?;
    Ok(Json(detail))
}

pub async fn set_status(
    user_info: UserInfo,
    suggestion_id: Path<i32>,
    Json(body): Json<StatusUpdate<SuggestionStatus>>,
    db: DB,
    guard: Privilege,
) -> Result<HttpResponse, Error> {
    suggestion::set_suggestion_status(db.begin().await?, guard.get_ref(), user_info.id, suggestion_id.into_inner(), body.status).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(user_info: UserInfo, suggestion_id: Path<i32>, db: DB, guard: Privilege) -> Result<HttpResponse, Error> {
    suggestion::delete_suggestion(db.begin().await?, guard.get_ref(), user_info.id, suggestion_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn cast_vote(user_info: UserInfo, suggestion_id: Path<i32>, Json(body): Json<VoteCast>, db: DB, guard: Privilege) -> Result<Json<VoteOutcome>, Error> {
    let outcome = vote::cast_vote(db.begin().await?, guard.get_ref(), user_info.id, suggestion_id.into_inner(), body.vote_type).await?;
    Ok(Json(outcome))
}

pub async fn remove_vote(user_info: UserInfo, suggestion_id: Path<i32>, db: DB, guard: Privilege) -> Result<Json<VoteOutcome>, Error> {
    let outcome = vote::remove_vote(db.begin().await?, guard.get_ref(), user_info.id, suggestion_id.into_inner()).await?;
    Ok(Json(outcome))
}

pub async fn add_comment(user_info: UserInfo, suggestion_id: Path<i32>, Json(body): Json<CommentCreate>, db: DB, guard: Privilege) -> Result<Json<CreateResponse>, Error> {
    let id = suggestion::add_comment(db.begin().await?, guard.get_ref(), user_info.id, suggestion_id.into_inner(), body).await?;
    Ok(Json(CreateResponse { id }))
}
