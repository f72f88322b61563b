use crate::core::models::feedback::{EventFeedback, FeedbackCreate, Insert as FeedbackInsert};
use crate::core::models::registration::RegistrationStatus;
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{EventCommon, FeedbackCommon, RegistrationCommon, Store, TxStore};
use crate::core::services::user::authorize;
use crate::error::Error;

pub async fn submit_feedback<T, G>(mut tx: T, guard: &G, uid: i32, event_id: i32, data: FeedbackCreate) -> Result<i32, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "feedback", "create").await?;
    if !(1..=5).contains(&data.rating) {
        return Err(Error::Validation("rating must be between 1 and 5".into()));
    }
    EventCommon::get(&mut tx, event_id).await?;
    match RegistrationCommon::find(&mut tx, uid, event_id).await? {
        Some(r) if r.status == RegistrationStatus::Attended => {}
        _ => return Err(Error::Forbidden("only attendees can leave feedback".into())),
    }
    let id = FeedbackCommon::insert(
        &mut tx,
        FeedbackInsert {
            user_id: uid,
            event_id,
            rating: data.rating,
            comment: data.comment,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(id)
}

pub async fn event_feedback<S>(db: &mut S, event_id: i32) -> Result<EventFeedback, Error>
where
    S: Store,
{
    EventCommon::get(db, event_id).await?;
    let list = FeedbackCommon::query_by_event(db, event_id).await?;
    let total = list.len() as i64;
    let average_rating = if list.is_empty() {
        None
    } else {
        Some(list.iter().map(|f| f.rating as f64).sum::<f64>() / list.len() as f64)
    };
    Ok(EventFeedback { list, total, average_rating })
}
