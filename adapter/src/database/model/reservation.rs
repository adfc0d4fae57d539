use chrono::NaiveDate;
use kernel::model::{
    id::{ListingId, ReservationId, UserId},
    reservation::{Reservation, ReservationListing, ReservationStatus, StayRange},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: Uuid,
    pub listing_id: Uuid,
    pub reserved_by: Uuid,
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub status: String,
    pub reserved_at: DateTime<Utc>,
    pub title: String,
    pub location_id: String,
    pub price_per_night: i64,
    pub owned_by: Uuid,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            listing_id,
            reserved_by,
            guest_name,
            check_in,
            check_out,
            total_price,
            status,
            reserved_at,
            title,
            location_id,
            price_per_night,
            owned_by,
        } = value;
        let status = status
            .parse::<ReservationStatus>()
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Reservation {
            id: ReservationId::from(reservation_id),
            reserved_by: UserId::from(reserved_by),
            guest_name,
            status,
            // the schema guarantees check_out > check_in
            stay: StayRange {
                check_in,
                check_out,
            },
            total_price,
            reserved_at,
            listing: ReservationListing {
                listing_id: ListingId::from(listing_id),
                title,
                location_id,
                price_per_night,
                owned_by: UserId::from(owned_by),
            },
        })
    }
}
