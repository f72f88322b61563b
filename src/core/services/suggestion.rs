use std::collections::HashMap;

use crate::core::models::common::Pagination;
use crate::core::models::suggestion::{CommentCreate, CommentInsert, Insert as SuggestionInsert, Query, SuggestionCreate, SuggestionDetail, SuggestionItem, SuggestionStatus};
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{Store, SuggestionCommon, TxStore, VoteCommon};
use crate::core::services::user::{authorize, caller};
use crate::error::Error;

pub async fn create_suggestion<T, G>(mut tx: T, guard: &G, uid: i32, data: SuggestionCreate) -> Result<i32, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "suggestion", "create").await?;
    if data.title.trim().is_empty() || data.description.trim().is_empty() {
        return Err(Error::Validation("title and description are required".into()));
    }
    let id = SuggestionCommon::insert(
        &mut tx,
        SuggestionInsert {
            user_id: uid,
            title: data.title,
            description: data.description,
            category: data.category,
        },
    )
    .await?;
    tx.commit().await?;
    log::info!("user {} submitted suggestion {}", uid, id);
    Ok(id)
}

pub async fn list_suggestions<S>(db: &mut S, uid: i32, query: Query, pagination: Pagination) -> Result<(Vec<SuggestionItem>, i64), Error>
where
    S: Store,
{
    let total = SuggestionCommon::count(db, &query).await?;
    let suggestions = SuggestionCommon::query(db, &query, pagination).await?;
    let ids: Vec<i32> = suggestions.iter().map(|s| s.id).collect();
    let mine: HashMap<i32, _> = VoteCommon::query_by_user(db, uid, &ids).await?.into_iter().map(|v| (v.suggestion_id, v.vote_type)).collect();
    let list = suggestions
        .into_iter()
        .map(|suggestion| SuggestionItem {
            my_vote: mine.get(&suggestion.id).copied(),
            suggestion,
        })
        .collect();
    Ok((list, total))
}

pub async fn suggestion_detail<S>(db: &mut S, uid: i32, id: i32) -> Result<SuggestionDetail, Error>
where
    S: Store,
{
    let suggestion = SuggestionCommon::get(db, id).await?;
    let my_vote = VoteCommon::find(db, uid, id).await?.map(|v| v.vote_type);
    let comments = SuggestionCommon::comments(db, id).await?;
    Ok(SuggestionDetail { suggestion, my_vote, comments })
}

pub async fn set_suggestion_status<T, G>(mut tx: T, guard: &G, uid: i32, id: i32, status: SuggestionStatus) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "suggestion", "review").await?;
    let suggestion = SuggestionCommon::get_for_update(&mut tx, id).await?;
    SuggestionCommon::set_status(&mut tx, id, status).await?;
    tx.commit().await?;
    log::info!("suggestion {} moved from {} to {} by user {}", id, suggestion.status, status, uid);
    Ok(())
}

pub async fn delete_suggestion<T, G>(mut tx: T, guard: &G, uid: i32, id: i32) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    let user = caller(&mut tx, uid).await?;
    let suggestion = SuggestionCommon::get_for_update(&mut tx, id).await?;
    if suggestion.user_id != user.id && !guard.allows(user.role, "suggestion", "manage_any")? {
        return Err(Error::Forbidden("not allowed to delete this suggestion".into()));
    }
    SuggestionCommon::delete(&mut tx, id).await?;
    tx.commit().await?;
    log::info!("user {} deleted suggestion {}", uid, id);
    Ok(())
}

pub async fn add_comment<T, G>(mut tx: T, guard: &G, uid: i32, suggestion_id: i32, data: CommentCreate) -> Result<i32, Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "suggestion", "comment").await?;
    if data.content.trim().is_empty() {
        return Err(Error::Validation("comment is empty".into()));
    }
    SuggestionCommon::get(&mut tx, suggestion_id).await?;
    let id = SuggestionCommon::insert_comment(
        &mut tx,
        CommentInsert {
            suggestion_id,
            user_id: uid,
            content: data.content,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(id)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::user::Role;
    use crate::core::models::vote::VoteType;
    use crate::core::services::vote::cast_vote;
    use crate::database::memory::MemoryStore;
    use crate::privilege::casbin::CasbinGuard;

    fn create_data() -> SuggestionCreate {
        SuggestionCreate {
            title: "Solar street lights".into(),
            description: "Install solar lights along the river road".into(),
            category: "infrastructure".into(),
        }
    }

    #[tokio::test]
    async fn test_list_carries_own_vote() {
        let store = MemoryStore::default();
        let guard = CasbinGuard::new().await.unwrap();
        let a = store.seed_user("a@sk.ph", Role::Youth);
        let b = store.seed_user("b@sk.ph", Role::Youth);
        let first = create_suggestion(store.tx().await, &guard, a, create_data()).await.unwrap();
        let second = create_suggestion(store.tx().await, &guard, a, create_data()).await.unwrap();
        cast_vote(store.tx().await, &guard, b, second, VoteType::Downvote).await.unwrap();

        let (list, total) = list_suggestions(&mut store.db(), b, Query::default(), Pagination::new(10, 0)).await.unwrap();
        assert_eq!(total, 2);
        let by_id: HashMap<i32, Option<VoteType>> = list.iter().map(|i| (i.suggestion.id, i.my_vote)).collect();
        assert_eq!(by_id[&first], None);
        assert_eq!(by_id[&second], Some(VoteType::Downvote));

        let (list, _) = list_suggestions(&mut store.db(), a, Query::default(), Pagination::new(10, 0)).await.unwrap();
        assert!(list.iter().all(|i| i.my_vote.is_none()));
    }

    #[tokio::test]
    async fn test_status_requires_review_permission() {
        let store = MemoryStore::default();
        let guard = CasbinGuard::new().await.unwrap();
        let a = store.seed_user("a@sk.ph", Role::Youth);
        let official = store.seed_user("o@sk.ph", Role::SkOfficial);
        let id = create_suggestion(store.tx().await, &guard, a, create_data()).await.unwrap();
        let res = set_suggestion_status(store.tx().await, &guard, a, id, SuggestionStatus::Approved).await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        set_suggestion_status(store.tx().await, &guard, official, id, SuggestionStatus::UnderReview).await.unwrap();
        let detail = suggestion_detail(&mut store.db(), a, id).await.unwrap();
        assert_eq!(detail.suggestion.status, SuggestionStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_comments_and_delete() {
        let store = MemoryStore::default();
        let guard = CasbinGuard::new().await.unwrap();
        let a = store.seed_user("a@sk.ph", Role::Youth);
        let b = store.seed_user("b@sk.ph", Role::Youth);
        let id = create_suggestion(store.tx().await, &guard, a, create_data()).await.unwrap();
        add_comment(store.tx().await, &guard, b, id, CommentCreate { content: "Great idea".into() }).await.unwrap();
        cast_vote(store.tx().await, &guard, b, id, VoteType::Upvote).await.unwrap();
        let detail = suggestion_detail(&mut store.db(), b, id).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.my_vote, Some(VoteType::Upvote));

        assert!(matches!(delete_suggestion(store.tx().await, &guard, b, id).await, Err(Error::Forbidden(_))));
        delete_suggestion(store.tx().await, &guard, a, id).await.unwrap();
        let snapshot = store.snapshot();
        assert!(snapshot.votes.is_empty());
        assert!(snapshot.comments.is_empty());
        let res = add_comment(store.tx().await, &guard, b, id, CommentCreate { content: "hello".into() }).await;
        assert!(matches!(res, Err(Error::NotFound(_))));
    }
}
