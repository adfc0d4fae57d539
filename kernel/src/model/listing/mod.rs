use crate::model::{
    id::{AmenityId, ListingId},
    user::ListingOwner,
};

pub mod event;

#[derive(Debug)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location_id: String,
    /// Nightly price in the smallest currency unit.
    pub price_per_night: i64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub guest_count: i32,
    pub image_urls: Vec<String>,
    pub amenities: Vec<Amenity>,
    pub owner: ListingOwner,
}

#[derive(Debug, Clone)]
pub struct Amenity {
    pub id: AmenityId,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub location_id: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub guest_count: Option<i32>,
}
