use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::Rating;

/// A comment on a title. Root reviews have no parent and may carry a rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub comment: String,
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub title_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub comment: String,
    pub rating: Option<Rating>,
}

impl Review {
    pub fn new(user_id: Uuid, input: &NewReview) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title_id: input.title_id,
            parent_id: input.parent_id,
            comment: input.comment.clone(),
            rating: input.rating,
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A review together with its replies, nested to any depth
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewThread {
    #[serde(flatten)]
    pub review: Review,
    pub replies: Vec<ReviewThread>,
}

/// Arranges a flat list of reviews of one title into threads.
///
/// Roots and replies at every level are ordered oldest first. Reviews whose
/// parent is not in the list are dropped.
pub fn build_threads(reviews: Vec<Review>) -> Vec<ReviewThread> {
    let mut children: HashMap<Option<Uuid>, Vec<Review>> = HashMap::new();
    for review in reviews {
        children.entry(review.parent_id).or_default().push(review);
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|r| r.created_at);
    }

    fn attach(
        parent: Option<Uuid>,
        children: &mut HashMap<Option<Uuid>, Vec<Review>>,
    ) -> Vec<ReviewThread> {
        let Some(siblings) = children.remove(&parent) else {
            return Vec::new();
        };
        siblings
            .into_iter()
            .map(|review| {
                let replies = attach(Some(review.id), children);
                ReviewThread { review, replies }
            })
            .collect()
    }

    attach(None, &mut children)
}

/// Mean of the given ratings rounded to one decimal place, `None` when empty
pub fn aggregate_rating(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i32 = ratings.iter().map(|r| r.value()).sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rating(value: i32) -> Rating {
        Rating::try_from(value).unwrap()
    }

    fn review(parent_id: Option<Uuid>, offset_secs: i64, comment: &str) -> Review {
        Review {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title_id: Uuid::nil(),
            parent_id,
            comment: comment.to_string(),
            rating: None,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_aggregate_rating() {
        assert_eq!(aggregate_rating(&[]), None);
        assert_eq!(aggregate_rating(&[rating(4), rating(2)]), Some(3.0));
        assert_eq!(aggregate_rating(&[rating(5), rating(4), rating(4)]), Some(4.3));
        assert_eq!(aggregate_rating(&[rating(1), rating(2), rating(2), rating(2)]), Some(1.8));
    }

    #[test]
    fn test_build_threads_nests_and_orders() {
        let root_late = review(None, 10, "late root");
        let root_early = review(None, 0, "early root");
        let reply = review(Some(root_early.id), 5, "reply");
        let nested = review(Some(reply.id), 6, "nested");
        let second_reply = review(Some(root_early.id), 1, "first reply");

        let threads = build_threads(vec![
            nested.clone(),
            root_late.clone(),
            reply.clone(),
            root_early.clone(),
            second_reply.clone(),
        ]);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].review.comment, "early root");
        assert_eq!(threads[1].review.comment, "late root");
        assert!(threads[1].replies.is_empty());

        let replies = &threads[0].replies;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].review.comment, "first reply");
        assert_eq!(replies[1].review.comment, "reply");
        assert_eq!(replies[1].replies[0].review.comment, "nested");
    }

    #[test]
    fn test_thread_serializes_flat_review_fields() {
        let root = review(None, 0, "hello");
        let json = serde_json::to_value(build_threads(vec![root])).unwrap();
        assert_eq!(json[0]["comment"], "hello");
        assert!(json[0]["replies"].as_array().unwrap().is_empty());
    }
}
