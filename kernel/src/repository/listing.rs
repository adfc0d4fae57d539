use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ListingId, UserId},
    list::{ListOptions, PaginatedList},
    listing::{
        event::{CreateListing, DeleteListing, UpdateListing},
        Amenity, Listing, ListingFilter,
    },
};

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, event: CreateListing, owner_id: UserId) -> AppResult<ListingId>;
    async fn find_all(
        &self,
        filter: ListingFilter,
        options: ListOptions,
    ) -> AppResult<PaginatedList<Listing>>;
    async fn find_by_id(&self, listing_id: ListingId) -> AppResult<Option<Listing>>;
    async fn update(&self, event: UpdateListing) -> AppResult<()>;
    async fn delete(&self, event: DeleteListing) -> AppResult<()>;
    async fn find_all_amenities(&self) -> AppResult<Vec<Amenity>>;
}
