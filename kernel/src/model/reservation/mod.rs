use chrono::{DateTime, NaiveDate, Utc};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, EnumString};

use crate::model::id::{ListingId, ReservationId, UserId};

pub mod event;

/// A stay as a half-open date interval: the guest occupies
/// `[check_in, check_out)`, with the check-out day free for a new arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    /// Rejects inverted and zero-length ranges before any overlap test runs.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::UnprocessableEntity(format!(
                "check-out ({check_out}) must be after check-in ({check_in})"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Standard half-open overlap test. Ranges that merely touch on a
    /// turnover day do not overlap.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn total_price(&self, price_per_night: i64) -> i64 {
        self.nights() * price_per_night
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// `pending -> confirmed | cancelled`, `confirmed -> cancelled | completed`;
    /// `cancelled` and `completed` are terminal.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
        )
    }
}

#[derive(Debug)]
pub struct Reservation {
    pub id: ReservationId,
    pub reserved_by: UserId,
    pub guest_name: String,
    pub status: ReservationStatus,
    pub stay: StayRange,
    pub total_price: i64,
    pub reserved_at: DateTime<Utc>,
    pub listing: ReservationListing,
}

#[derive(Debug)]
pub struct ReservationListing {
    pub listing_id: ListingId,
    pub title: String,
    pub location_id: String,
    pub price_per_night: i64,
    pub owned_by: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_and_zero_length_ranges() {
        assert!(StayRange::new(date(2024, 6, 10), date(2024, 6, 8)).is_err());
        assert!(StayRange::new(date(2024, 6, 10), date(2024, 6, 10)).is_err());
        assert!(StayRange::new(date(2024, 6, 8), date(2024, 6, 10)).is_ok());
    }

    #[test]
    fn adjacent_stays_share_a_turnover_day_without_overlapping() {
        let booked = StayRange::new(date(2024, 6, 1), date(2024, 6, 5)).unwrap();
        let following = StayRange::new(date(2024, 6, 5), date(2024, 6, 10)).unwrap();

        assert!(!booked.overlaps(&following));
        assert!(!following.overlaps(&booked));
    }

    #[test]
    fn overlap_is_detected_symmetrically() {
        let booked = StayRange::new(date(2024, 6, 1), date(2024, 6, 5)).unwrap();
        let overlapping = StayRange::new(date(2024, 6, 3), date(2024, 6, 7)).unwrap();

        assert!(booked.overlaps(&overlapping));
        assert!(overlapping.overlaps(&booked));

        let contained = StayRange::new(date(2024, 6, 2), date(2024, 6, 4)).unwrap();
        assert!(booked.overlaps(&contained));
        assert!(contained.overlaps(&booked));

        assert!(booked.overlaps(&booked));
    }

    #[test]
    fn nights_exclude_the_check_out_day() {
        let stay = StayRange::new(date(2024, 6, 1), date(2024, 6, 5)).unwrap();

        assert_eq!(stay.nights(), 4);
        assert_eq!(stay.total_price(12_000), 48_000);
    }

    #[test]
    fn status_transitions_follow_the_lifecycle() {
        use ReservationStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn status_round_trips_through_storage_strings() {
        use ReservationStatus::*;

        for status in [Pending, Confirmed, Cancelled, Completed] {
            assert_eq!(
                status.as_ref().parse::<ReservationStatus>().unwrap(),
                status
            );
        }
    }
}
