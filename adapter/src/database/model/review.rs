use kernel::model::{
    id::{ListingId, ReviewId, UserId},
    review::Review,
    user::Reviewer,
};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: Uuid,
    pub listing_id: Uuid,
    pub reviewed_by: Uuid,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        let ReviewRow {
            review_id,
            listing_id,
            reviewed_by,
            reviewer_name,
            rating,
            comment,
            created_at,
        } = value;
        Review {
            id: ReviewId::from(review_id),
            listing_id: ListingId::from(listing_id),
            rating,
            comment,
            reviewer: Reviewer {
                user_id: UserId::from(reviewed_by),
                user_name: reviewer_name,
            },
            created_at,
        }
    }
}
