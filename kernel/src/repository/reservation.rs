use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::{ListingId, ReservationId, UserId},
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        Reservation, StayRange,
    },
};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Books a stay after checking the listing for conflicting reservations.
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    /// Read-only availability probe for a candidate stay.
    async fn is_available(&self, listing_id: ListingId, stay: &StayRange) -> AppResult<bool>;
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    /// A guest's reservations, oldest first.
    async fn find_all_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    /// All reservations taken against a listing, oldest first.
    async fn find_all_by_listing_id(&self, listing_id: ListingId) -> AppResult<Vec<Reservation>>;
}
