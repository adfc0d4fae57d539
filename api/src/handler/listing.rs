use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{id::ListingId, listing::event::DeleteListing};
use registry::AppRegistry;
use shared::{
    error::{AppError, AppResult},
    response::Envelope,
};

use crate::{
    extractor::AuthorizedUser,
    model::listing::{
        AmenitiesResponse, CreateListingRequest, CreatedListingResponse, ListingListQuery,
        ListingResponse, PaginatedListingResponse, UpdateListingRequest,
        UpdateListingRequestWithIds,
    },
};

pub async fn register_listing(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let listing_id = registry
        .listing_repository()
        .create(req.into(), user.id())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(CreatedListingResponse { listing_id })),
    ))
}

pub async fn show_listing_list(
    _user: AuthorizedUser,
    Query(query): Query<ListingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<PaginatedListingResponse>>> {
    query.validate(&())?;

    let (filter, options) = query.into_parts();
    registry
        .listing_repository()
        .find_all(filter, options)
        .await
        .map(PaginatedListingResponse::from)
        .map(Envelope::ok)
        .map(Json)
}

pub async fn show_listing(
    _user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ListingResponse>>> {
    registry
        .listing_repository()
        .find_by_id(listing_id)
        .await
        .and_then(|listing| match listing {
            Some(listing) => Ok(Json(Envelope::ok(listing.into()))),
            None => Err(AppError::EntityNotFound(format!(
                "listing {listing_id} not found"
            ))),
        })
}

pub async fn update_listing(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateListingRequest>,
) -> AppResult<Json<Envelope<()>>> {
    req.validate(&())?;

    let update_listing = UpdateListingRequestWithIds::new(listing_id, user.id(), req);
    registry
        .listing_repository()
        .update(update_listing.into())
        .await?;

    Ok(Json(Envelope::ok_empty()))
}

pub async fn delete_listing(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    let delete_listing = DeleteListing {
        listing_id,
        requested_user: user.id(),
    };
    registry.listing_repository().delete(delete_listing).await?;

    Ok(Json(Envelope::ok_empty()))
}

pub async fn show_amenity_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<AmenitiesResponse>>> {
    registry
        .listing_repository()
        .find_all_amenities()
        .await
        .map(AmenitiesResponse::from)
        .map(Envelope::ok)
        .map(Json)
}
