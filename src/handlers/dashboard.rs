use actix_web::web::Json;

use crate::context::UserInfo;
use crate::core::models::dashboard::{Reconciled, Stats};
use crate::core::services::dashboard;
use crate::error::Error;
use crate::handlers::{Privilege, DB};

pub async fn stats(user_info: UserInfo, db: DB, guard: Privilege) -> Result<Json<Stats>, Error> {
    let stats = dashboard::dashboard_stats(&mut db.acquire().await?, guard.get_ref(), user_info.id).await?;
    Ok(Json(stats))
}

pub async fn reconcile(user_info: UserInfo, db: DB, guard: Privilege) -> Result<Json<Reconciled>, Error> {
    let fixed = dashboard::reconcile_counters(db.begin().await?, guard.get_ref(), user_info.id).await?;
    Ok(Json(fixed))
}
