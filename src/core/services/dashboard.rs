use crate::core::models::dashboard::{Reconciled, Stats};
use crate::core::models::registration::Query as RegistrationQuery;
use crate::core::models::user::Query as UserQuery;
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{EventCommon, FeedbackCommon, RegistrationCommon, Store, SuggestionCommon, TxStore, UserCommon};
use crate::core::services::user::authorize;
use crate::error::Error;

pub async fn dashboard_stats<S, G>(db: &mut S, guard: &G, uid: i32) -> Result<Stats, Error>
where
    S: Store,
    G: Guard,
{
    authorize(db, guard, uid, "dashboard", "read").await?;
    let users_total = UserCommon::count(db, &UserQuery::default()).await?;
    let users_active = UserCommon::count(
        db,
        &UserQuery {
            is_active_eq: Some(true),
            ..default::default()
        },
    )
    .await?;
    let events_by_status = EventCommon::count_by_status(db).await?;
    let registrations_total = RegistrationCommon::count(db, &RegistrationQuery::default()).await?;
    let suggestions_by_status = SuggestionCommon::count_by_status(db).await?;
    let feedback_total = FeedbackCommon::count(db).await?;
    Ok(Stats {
        users_total,
        users_active,
        events_by_status,
        registrations_total,
        suggestions_by_status,
        feedback_total,
    })
}

/// Rebuilds the denormalized participant and vote counters from their ledgers.
pub async fn reconcile_counters<T, G>(mut tx: T, guard: &G, uid: i32) -> Result<Reconciled, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "counters", "reconcile").await?;
    let events = EventCommon::reconcile_participants(&mut tx).await?;
    let suggestions = SuggestionCommon::reconcile_votes(&mut tx).await?;
    tx.commit().await?;
    if events > 0 || suggestions > 0 {
        log::warn!("counter drift repaired: {} events, {} suggestions", events, suggestions);
    }
    Ok(Reconciled { events, suggestions })
}
