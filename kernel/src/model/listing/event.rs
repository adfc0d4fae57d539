use crate::model::id::{AmenityId, ListingId, UserId};

pub struct CreateListing {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location_id: String,
    pub price_per_night: i64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub guest_count: i32,
    pub image_urls: Vec<String>,
    pub amenity_ids: Vec<AmenityId>,
}

#[derive(Debug)]
pub struct UpdateListing {
    pub listing_id: ListingId,
    pub requested_user: UserId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location_id: Option<String>,
    pub price_per_night: Option<i64>,
    pub room_count: Option<i32>,
    pub bathroom_count: Option<i32>,
    pub guest_count: Option<i32>,
    pub image_urls: Option<Vec<String>>,
    pub amenity_ids: Option<Vec<AmenityId>>,
}

#[derive(Debug)]
pub struct DeleteListing {
    pub listing_id: ListingId,
    pub requested_user: UserId,
}
