use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{AmenityId, ListingId, UserId},
    list::{ListOptions, PaginatedList},
    listing::{
        event::{CreateListing, UpdateListing},
        Amenity, Listing, ListingFilter,
    },
    user::ListingOwner,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    pub description: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(length(min = 1))]
    pub location_id: String,
    #[garde(range(min = 0))]
    pub price_per_night: i64,
    #[garde(range(min = 1))]
    pub room_count: i32,
    #[garde(range(min = 1))]
    pub bathroom_count: i32,
    #[garde(range(min = 1))]
    pub guest_count: i32,
    #[garde(skip)]
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[garde(skip)]
    #[serde(default)]
    pub amenity_ids: Vec<AmenityId>,
}

impl From<CreateListingRequest> for CreateListing {
    fn from(value: CreateListingRequest) -> Self {
        let CreateListingRequest {
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            amenity_ids,
        } = value;
        CreateListing {
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            amenity_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(length(min = 1))]
    pub category: Option<String>,
    #[garde(length(min = 1))]
    pub location_id: Option<String>,
    #[garde(range(min = 0))]
    pub price_per_night: Option<i64>,
    #[garde(range(min = 1))]
    pub room_count: Option<i32>,
    #[garde(range(min = 1))]
    pub bathroom_count: Option<i32>,
    #[garde(range(min = 1))]
    pub guest_count: Option<i32>,
    #[garde(skip)]
    pub image_urls: Option<Vec<String>>,
    #[garde(skip)]
    pub amenity_ids: Option<Vec<AmenityId>>,
}

#[derive(new)]
pub struct UpdateListingRequestWithIds(ListingId, UserId, UpdateListingRequest);

impl From<UpdateListingRequestWithIds> for UpdateListing {
    fn from(value: UpdateListingRequestWithIds) -> Self {
        let UpdateListingRequestWithIds(
            listing_id,
            requested_user,
            UpdateListingRequest {
                title,
                description,
                category,
                location_id,
                price_per_night,
                room_count,
                bathroom_count,
                guest_count,
                image_urls,
                amenity_ids,
            },
        ) = value;
        UpdateListing {
            listing_id,
            requested_user,
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            amenity_ids,
        }
    }
}

const DEFAULT_LIMIT: i64 = 20;
const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingListQuery {
    #[garde(range(min = 0))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
    #[garde(skip)]
    pub category: Option<String>,
    #[garde(skip)]
    pub location_id: Option<String>,
    #[garde(range(min = 0))]
    pub min_price: Option<i64>,
    #[garde(range(min = 0))]
    pub max_price: Option<i64>,
    #[garde(range(min = 1))]
    pub guest_count: Option<i32>,
}

impl ListingListQuery {
    pub fn into_parts(self) -> (ListingFilter, ListOptions) {
        let ListingListQuery {
            limit,
            offset,
            category,
            location_id,
            min_price,
            max_price,
            guest_count,
        } = self;
        (
            ListingFilter {
                category,
                location_id,
                min_price,
                max_price,
                guest_count,
            },
            ListOptions { limit, offset },
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedListingResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<ListingResponse>,
}

impl From<PaginatedList<Listing>> for PaginatedListingResponse {
    fn from(value: PaginatedList<Listing>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(ListingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    pub items: Vec<ListingResponse>,
}

impl From<Vec<Listing>> for ListingsResponse {
    fn from(value: Vec<Listing>) -> Self {
        Self {
            items: value.into_iter().map(ListingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location_id: String,
    pub price_per_night: i64,
    pub room_count: i32,
    pub bathroom_count: i32,
    pub guest_count: i32,
    pub image_urls: Vec<String>,
    pub amenities: Vec<AmenityResponse>,
    pub owner: ListingOwnerResponse,
}

impl From<Listing> for ListingResponse {
    fn from(value: Listing) -> Self {
        let Listing {
            id,
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
            owner,
        } = value;
        Self {
            id,
            title,
            description,
            category,
            location_id,
            price_per_night,
            room_count,
            bathroom_count,
            guest_count,
            image_urls,
            amenities: amenities.into_iter().map(AmenityResponse::from).collect(),
            owner: owner.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityResponse {
    pub id: AmenityId,
    pub name: String,
    pub category: String,
}

impl From<Amenity> for AmenityResponse {
    fn from(value: Amenity) -> Self {
        let Amenity { id, name, category } = value;
        Self { id, name, category }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenitiesResponse {
    pub items: Vec<AmenityResponse>,
}

impl From<Vec<Amenity>> for AmenitiesResponse {
    fn from(value: Vec<Amenity>) -> Self {
        Self {
            items: value.into_iter().map(AmenityResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOwnerResponse {
    pub owner_id: UserId,
    pub owner_name: String,
}

impl From<ListingOwner> for ListingOwnerResponse {
    fn from(value: ListingOwner) -> Self {
        let ListingOwner {
            owner_id,
            owner_name,
        } = value;
        Self {
            owner_id,
            owner_name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedListingResponse {
    pub listing_id: ListingId,
}
