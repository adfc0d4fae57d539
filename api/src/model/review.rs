use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{ListingId, ReviewId, UserId},
    review::Review,
    user::Reviewer,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(skip)]
    pub comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub items: Vec<ReviewResponse>,
}

impl From<Vec<Review>> for ReviewsResponse {
    fn from(value: Vec<Review>) -> Self {
        Self {
            items: value.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub listing_id: ListingId,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer: ReviewerResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        let Review {
            id,
            listing_id,
            rating,
            comment,
            reviewer,
            created_at,
        } = value;
        Self {
            review_id: id,
            listing_id,
            rating,
            comment,
            reviewer: reviewer.into(),
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<Reviewer> for ReviewerResponse {
    fn from(value: Reviewer) -> Self {
        let Reviewer { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReviewResponse {
    pub review_id: ReviewId,
}
