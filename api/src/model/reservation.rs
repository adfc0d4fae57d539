use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::{
    id::{ListingId, ReservationId, UserId},
    reservation::{Reservation, ReservationListing, ReservationStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatusName {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl From<ReservationStatus> for ReservationStatusName {
    fn from(value: ReservationStatus) -> Self {
        match value {
            ReservationStatus::Pending => Self::Pending,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Cancelled => Self::Cancelled,
            ReservationStatus::Completed => Self::Completed,
        }
    }
}

impl From<ReservationStatusName> for ReservationStatus {
    fn from(value: ReservationStatusName) -> Self {
        match value {
            ReservationStatusName::Pending => Self::Pending,
            ReservationStatusName::Confirmed => Self::Confirmed,
            ReservationStatusName::Cancelled => Self::Cancelled,
            ReservationStatusName::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub check_in: NaiveDate,
    #[garde(skip)]
    pub check_out: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatusName,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub reserved_by: UserId,
    pub guest_name: String,
    pub status: ReservationStatusName,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub reserved_at: DateTime<Utc>,
    pub listing: ReservationListingResponse,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            reserved_by,
            guest_name,
            status,
            stay,
            total_price,
            reserved_at,
            listing,
        } = value;
        Self {
            reservation_id: id,
            reserved_by,
            guest_name,
            status: status.into(),
            check_in: stay.check_in,
            check_out: stay.check_out,
            total_price,
            reserved_at,
            listing: listing.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListingResponse {
    pub listing_id: ListingId,
    pub title: String,
    pub location_id: String,
    pub price_per_night: i64,
}

impl From<ReservationListing> for ReservationListingResponse {
    fn from(value: ReservationListing) -> Self {
        let ReservationListing {
            listing_id,
            title,
            location_id,
            price_per_night,
            owned_by: _,
        } = value;
        Self {
            listing_id,
            title,
            location_id,
            price_per_night,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationResponse {
    pub reservation_id: ReservationId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_request_accepts_camel_case_dates() {
        let req: CreateReservationRequest =
            serde_json::from_str(r#"{"checkIn":"2024-06-01","checkOut":"2024-06-05"}"#).unwrap();

        assert_eq!(req.check_in, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(req.check_out, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    }

    #[test]
    fn status_names_serialize_lowercase() {
        let req: UpdateReservationStatusRequest =
            serde_json::from_str(r#"{"status":"confirmed"}"#).unwrap();
        assert_eq!(req.status, ReservationStatusName::Confirmed);

        let body = serde_json::to_string(&ReservationStatusName::Cancelled).unwrap();
        assert_eq!(body, r#""cancelled""#);
    }
}
