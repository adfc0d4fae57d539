use derive_new::new;

use super::{ReservationStatus, StayRange};
use crate::model::id::{ListingId, ReservationId, UserId};

#[derive(new)]
pub struct CreateReservation {
    pub listing_id: ListingId,
    pub reserved_by: UserId,
    pub stay: StayRange,
}

#[derive(new)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub requested_user: UserId,
    pub status: ReservationStatus,
}
