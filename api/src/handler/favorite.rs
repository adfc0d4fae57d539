use axum::{
    extract::{Path, State},
    Json,
};
use kernel::model::id::ListingId;
use registry::AppRegistry;
use shared::{error::AppResult, response::Envelope};

use crate::{extractor::AuthorizedUser, model::listing::ListingsResponse};

pub async fn add_favorite(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .favorite_repository()
        .add(user.id(), listing_id)
        .await?;

    Ok(Json(Envelope::ok_empty()))
}

pub async fn remove_favorite(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .favorite_repository()
        .remove(user.id(), listing_id)
        .await?;

    Ok(Json(Envelope::ok_empty()))
}

pub async fn show_favorite_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ListingsResponse>>> {
    registry
        .favorite_repository()
        .find_all_by_user_id(user.id())
        .await
        .map(ListingsResponse::from)
        .map(Envelope::ok)
        .map(Json)
}
