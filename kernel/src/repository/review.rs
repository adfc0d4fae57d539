use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ListingId, ReviewId},
    review::{
        event::{CreateReview, DeleteReview},
        Review,
    },
};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// At most one review per (listing, reviewer) pair.
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId>;
    async fn find_all_by_listing_id(&self, listing_id: ListingId) -> AppResult<Vec<Review>>;
    async fn delete(&self, event: DeleteReview) -> AppResult<()>;
}
