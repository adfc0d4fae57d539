use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ListingId, UserId},
    listing::Listing,
};

/// A user's favorites form an unordered set of listings; adding and removing
/// are idempotent membership toggles.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn add(&self, user_id: UserId, listing_id: ListingId) -> AppResult<()>;
    async fn remove(&self, user_id: UserId, listing_id: ListingId) -> AppResult<()>;
    async fn find_all_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Listing>>;
}
