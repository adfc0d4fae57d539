use kernel::model::{
    id::{AmenityId, ListingId, UserId},
    listing::{Amenity, Listing},
    user::ListingOwner,
};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct ListingRow {
    pub listing_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location_id: String,
    pub price_per_night: i64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub guest_count: i32,
    pub image_urls: Vec<String>,
    pub owned_by: Uuid,
    pub owner_name: String,
}

impl ListingRow {
    // Amenities are loaded separately and joined in by the repository.
    pub fn into_listing(self, amenities: Vec<Amenity>) -> Listing {
        let ListingRow {
            listing_id,
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            owned_by,
            owner_name,
        } = self;
        Listing {
            id: ListingId::from(listing_id),
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            amenities,
            owner: ListingOwner {
                owner_id: UserId::from(owned_by),
                owner_name,
            },
        }
    }
}

// Pagination query helper row: the window total plus the page of ids.
#[derive(sqlx::FromRow)]
pub struct PaginatedListingRow {
    pub total: i64,
    pub listing_id: Uuid,
}

#[derive(sqlx::FromRow)]
pub struct AmenityRow {
    pub amenity_id: Uuid,
    pub name: String,
    pub category: String,
}

impl From<AmenityRow> for Amenity {
    fn from(value: AmenityRow) -> Self {
        let AmenityRow {
            amenity_id,
            name,
            category,
        } = value;
        Amenity {
            id: AmenityId::from(amenity_id),
            name,
            category,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct ListingAmenityRow {
    pub listing_id: Uuid,
    pub amenity_id: Uuid,
    pub name: String,
    pub category: String,
}
