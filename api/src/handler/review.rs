use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ListingId, ReviewId},
    review::event::{CreateReview, DeleteReview},
};
use registry::AppRegistry;
use shared::{
    error::{AppError, AppResult},
    response::Envelope,
};

use crate::{
    extractor::AuthorizedUser,
    model::review::{CreateReviewRequest, CreatedReviewResponse, ReviewsResponse},
};

pub async fn register_review(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let review_id = registry
        .review_repository()
        .create(CreateReview::new(
            listing_id,
            user.id(),
            req.rating,
            req.comment,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(CreatedReviewResponse { review_id })),
    ))
}

pub async fn show_review_list(
    _user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ReviewsResponse>>> {
    registry
        .listing_repository()
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("listing {listing_id} not found")))?;

    registry
        .review_repository()
        .find_all_by_listing_id(listing_id)
        .await
        .map(ReviewsResponse::from)
        .map(Envelope::ok)
        .map(Json)
}

pub async fn delete_review(
    user: AuthorizedUser,
    Path(review_id): Path<ReviewId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .review_repository()
        .delete(DeleteReview::new(review_id, user.id()))
        .await?;

    Ok(Json(Envelope::ok_empty()))
}
