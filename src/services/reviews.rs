use uuid::Uuid;

use crate::{
    db::{ReviewRepository, TitleRepository},
    error::{AppError, AppResult},
    models::{review::build_threads, NewReview, Review, ReviewThread},
};

/// Posts a review or a reply.
///
/// Replies must target a review of the same title and cannot carry a rating.
/// Posting a root review refreshes the title's aggregate rating.
pub async fn create_review<T, R>(
    titles: &T,
    reviews: &R,
    user_id: Uuid,
    input: &NewReview,
) -> AppResult<Review>
where
    T: TitleRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    titles
        .find_title(input.title_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", input.title_id)))?;

    if let Some(parent_id) = input.parent_id {
        if input.rating.is_some() {
            return Err(AppError::Validation(
                "Replies cannot carry a rating".to_string(),
            ));
        }
        let parent = reviews
            .find_review(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", parent_id)))?;
        if parent.title_id != input.title_id {
            return Err(AppError::Validation(
                "Reply must belong to the same title as its parent".to_string(),
            ));
        }
    }

    let review = reviews.insert_review(user_id, input).await?;

    if review.is_root() {
        let aggregate = titles.refresh_aggregate_rating(review.title_id).await?;
        tracing::info!(
            title_id = %review.title_id,
            aggregate_rating = ?aggregate,
            "Aggregate rating refreshed"
        );
    }

    tracing::info!(
        review_id = %review.id,
        user_id = %user_id,
        title_id = %review.title_id,
        is_reply = !review.is_root(),
        "Review created"
    );

    Ok(review)
}

/// All reviews of a title, arranged into threads
pub async fn list_threads<T, R>(
    titles: &T,
    reviews: &R,
    title_id: Uuid,
) -> AppResult<Vec<ReviewThread>>
where
    T: TitleRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    titles
        .find_title(title_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", title_id)))?;

    let all = reviews.list_reviews(title_id).await?;
    Ok(build_threads(all))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{MediaKind, NewTitle, Rating};

    async fn seeded() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let title = store
            .upsert_title(&NewTitle {
                external_id: 550,
                name: "Fight Club".to_string(),
                media_kind: MediaKind::Movie,
                poster_path: None,
            })
            .await
            .unwrap();
        (store, title.id)
    }

    fn root(title_id: Uuid, rating: Option<i32>) -> NewReview {
        NewReview {
            title_id,
            parent_id: None,
            comment: "comment".to_string(),
            rating: rating.map(|r| Rating::try_from(r).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_root_reviews_average_into_title() {
        let (store, title_id) = seeded().await;
        let user = Uuid::new_v4();

        create_review(&store, &store, user, &root(title_id, Some(4))).await.unwrap();
        create_review(&store, &store, user, &root(title_id, Some(2))).await.unwrap();

        let title = store.find_title(title_id).await.unwrap().unwrap();
        assert_eq!(title.aggregate_rating, Some(3.0));
    }

    #[tokio::test]
    async fn test_rated_reply_rejected() {
        let (store, title_id) = seeded().await;
        let user = Uuid::new_v4();
        let parent = create_review(&store, &store, user, &root(title_id, None)).await.unwrap();

        let mut reply = root(title_id, Some(5));
        reply.parent_id = Some(parent.id);
        let err = create_review(&store, &store, user, &reply).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reply_to_other_title_rejected() {
        let (store, title_id) = seeded().await;
        let other = store
            .upsert_title(&NewTitle {
                external_id: 1399,
                name: "Game of Thrones".to_string(),
                media_kind: MediaKind::Series,
                poster_path: None,
            })
            .await
            .unwrap();
        let user = Uuid::new_v4();
        let parent = create_review(&store, &store, user, &root(title_id, None)).await.unwrap();

        let mut reply = root(other.id, None);
        reply.parent_id = Some(parent.id);
        let err = create_review(&store, &store, user, &reply).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_title_and_parent_not_found() {
        let (store, title_id) = seeded().await;
        let user = Uuid::new_v4();

        let err = create_review(&store, &store, user, &root(Uuid::new_v4(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let mut reply = root(title_id, None);
        reply.parent_id = Some(Uuid::new_v4());
        let err = create_review(&store, &store, user, &reply).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_threads_nests_replies() {
        let (store, title_id) = seeded().await;
        let user = Uuid::new_v4();
        let parent = create_review(&store, &store, user, &root(title_id, Some(5))).await.unwrap();
        let mut reply = root(title_id, None);
        reply.parent_id = Some(parent.id);
        create_review(&store, &store, user, &reply).await.unwrap();

        let threads = list_threads(&store, &store, title_id).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].replies.len(), 1);
    }
}
