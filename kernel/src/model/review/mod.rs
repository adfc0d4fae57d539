use chrono::{DateTime, Utc};

use crate::model::{
    id::{ListingId, ReviewId},
    user::Reviewer,
};

pub mod event;

#[derive(Debug)]
pub struct Review {
    pub id: ReviewId,
    pub listing_id: ListingId,
    /// Bounded 1..=5, enforced at the boundary and by the schema.
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer: Reviewer,
    pub created_at: DateTime<Utc>,
}
