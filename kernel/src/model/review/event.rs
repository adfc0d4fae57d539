use derive_new::new;

use crate::model::id::{ListingId, ReviewId, UserId};

#[derive(new)]
pub struct CreateReview {
    pub listing_id: ListingId,
    pub reviewed_by: UserId,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(new)]
pub struct DeleteReview {
    pub review_id: ReviewId,
    pub requested_user: UserId,
}
