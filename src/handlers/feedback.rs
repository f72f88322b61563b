use actix_web::web::{Json, Path};

use crate::context::UserInfo;
use crate::core::models::feedback::{EventFeedback, FeedbackCreate};
use crate::core::services::feedback;
use crate::error::Error;
use crate::handlers::{Privilege, DB};
use crate::response::CreateResponse;

pub async fn submit(user_info: UserInfo, event_id: Path<i32>, Json(body): Json<FeedbackCreate>, db: DB, guard: Privilege) -> Result<Json<CreateResponse>, Error> {
    let id = feedback::submit_feedback(db.begin().await?, guard.get_ref(), user_info.id, event_id.into_inner(), body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(event_id: Path<i32>, db: DB) -> Result<Json<EventFeedback>, Error> {
    let summary = feedback::event_feedback(&mut db.acquire().await?, event_id.into_inner()).await?;
    Ok(Json(summary))
}
