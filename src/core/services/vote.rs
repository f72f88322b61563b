use crate::core::models::vote::{Insert as VoteInsert, VoteOutcome, VoteType};
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{SuggestionCommon, TxStore, VoteCommon};
use crate::core::services::user::authorize;
use crate::error::Error;

/// What a vote request does to the ledger given the caller's current vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Insert(VoteType),
    Switch { from: VoteType, to: VoteType },
    Retract(VoteType),
}

impl Plan {
    pub fn new(existing: Option<VoteType>, requested: VoteType) -> Self {
        match existing {
            None => Plan::Insert(requested),
            Some(current) if current == requested => Plan::Retract(current),
            Some(current) => Plan::Switch { from: current, to: requested },
        }
    }

    /// The caller's vote after the plan is applied.
    pub fn result(&self) -> Option<VoteType> {
        match self {
            Plan::Insert(t) => Some(*t),
            Plan::Switch { to, .. } => Some(*to),
            Plan::Retract(_) => None,
        }
    }
}

/// Casts, switches or (on a repeated vote of the same type) withdraws the caller's vote.
pub async fn cast_vote<T, G>(mut tx: T, guard: &G, uid: i32, suggestion_id: i32, vote_type: VoteType) -> Result<VoteOutcome, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "suggestion", "vote").await?;
    let suggestion = SuggestionCommon::get_for_update(&mut tx, suggestion_id).await?;
    let existing = VoteCommon::find(&mut tx, uid, suggestion.id).await?;
    let plan = Plan::new(existing.as_ref().map(|v| v.vote_type), vote_type);
    match (plan, existing) {
        (Plan::Insert(t), _) => {
            VoteCommon::insert(
                &mut tx,
                VoteInsert {
                    user_id: uid,
                    suggestion_id: suggestion.id,
                    vote_type: t,
                },
            )
            .await?;
            SuggestionCommon::adjust_votes(&mut tx, suggestion.id, t, 1).await?;
        }
        (Plan::Switch { from, to }, Some(vote)) => {
            VoteCommon::update_type(&mut tx, vote.id, to).await?;
            SuggestionCommon::adjust_votes(&mut tx, suggestion.id, from, -1).await?;
            SuggestionCommon::adjust_votes(&mut tx, suggestion.id, to, 1).await?;
        }
        (Plan::Retract(t), Some(vote)) => {
            VoteCommon::delete(&mut tx, vote.id).await?;
            SuggestionCommon::adjust_votes(&mut tx, suggestion.id, t, -1).await?;
        }
        (plan, None) => return Err(Error::ServerError(format!("vote plan {:?} without an existing vote", plan))),
    }
    let votes = SuggestionCommon::get(&mut tx, suggestion.id).await?.votes;
    tx.commit().await?;
    log::debug!("user {} vote on suggestion {}: {:?}", uid, suggestion_id, plan);
    Ok(VoteOutcome { votes, my_vote: plan.result() })
}

/// Withdraws the caller's vote if there is one.
pub async fn remove_vote<T, G>(mut tx: T, guard: &G, uid: i32, suggestion_id: i32) -> Result<VoteOutcome, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "suggestion", "vote").await?;
    let suggestion = SuggestionCommon::get_for_update(&mut tx, suggestion_id).await?;
    if let Some(vote) = VoteCommon::find(&mut tx, uid, suggestion.id).await? {
        VoteCommon::delete(&mut tx, vote.id).await?;
        SuggestionCommon::adjust_votes(&mut tx, suggestion.id, vote.vote_type, -1).await?;
    }
    let votes = SuggestionCommon::get(&mut tx, suggestion.id).await?.votes;
    tx.commit().await?;
    Ok(VoteOutcome { votes, my_vote: None })
}
