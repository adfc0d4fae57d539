use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kernel::model::{
    id::{ListingId, ReservationId},
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        StayRange,
    },
};
use registry::AppRegistry;
use shared::{
    error::{AppError, AppResult},
    response::Envelope,
};

use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        AvailabilityQuery, AvailabilityResponse, CreateReservationRequest,
        CreatedReservationResponse, ReservationResponse, ReservationsResponse,
        UpdateReservationStatusRequest,
    },
};

pub async fn reserve_listing(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    // inverted or empty stays never reach the overlap check
    let stay = StayRange::new(req.check_in, req.check_out)?;

    let reservation_id = registry
        .reservation_repository()
        .create(CreateReservation::new(listing_id, user.id(), stay))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(CreatedReservationResponse { reservation_id })),
    ))
}

pub async fn check_availability(
    _user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<AvailabilityResponse>>> {
    let stay = StayRange::new(query.check_in, query.check_out)?;

    let available = registry
        .reservation_repository()
        .is_available(listing_id, &stay)
        .await?;

    Ok(Json(Envelope::ok(AvailabilityResponse {
        listing_id,
        check_in: stay.check_in,
        check_out: stay.check_out,
        available,
    })))
}

pub async fn show_reservation_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ReservationsResponse>>> {
    registry
        .reservation_repository()
        .find_all_by_user_id(user.id())
        .await
        .map(ReservationsResponse::from)
        .map(Envelope::ok)
        .map(Json)
}

pub async fn show_listing_reservations(
    user: AuthorizedUser,
    Path(listing_id): Path<ListingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ReservationsResponse>>> {
    let listing = registry
        .listing_repository()
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("listing {listing_id} not found")))?;

    // the calendar of a listing is host-only
    if listing.owner.owner_id != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .reservation_repository()
        .find_all_by_listing_id(listing_id)
        .await
        .map(ReservationsResponse::from)
        .map(Envelope::ok)
        .map(Json)
}

pub async fn show_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<ReservationResponse>>> {
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("reservation {reservation_id} not found"))
        })?;

    // visible to the guest and the host, nobody else
    if reservation.reserved_by != user.id() && reservation.listing.owned_by != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    Ok(Json(Envelope::ok(ReservationResponse::from(reservation))))
}

pub async fn update_reservation_status(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .reservation_repository()
        .update_status(UpdateReservationStatus::new(
            reservation_id,
            user.id(),
            req.status.into(),
        ))
        .await?;

    Ok(Json(Envelope::ok_empty()))
}
