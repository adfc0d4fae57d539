use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{ListingId, ReservationId, UserId},
        reservation::{
            event::{CreateReservation, UpdateReservationStatus},
            Reservation, ReservationStatus, StayRange,
        },
    },
    repository::reservation::ReservationRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // The overlap check and the insert must not interleave with a
        // competing booking, so the whole block runs SERIALIZABLE.
        self.set_transaction_serializable(&mut tx).await?;

        let stay = event.stay;

        // listing existence check + nightly price lookup
        let listing_row = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
                SELECT owned_by, price_per_night
                FROM listings
                WHERE listing_id = $1
            "#,
        )
        .bind(event.listing_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let (owned_by, price_per_night) = match listing_row {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "listing {} not found",
                    event.listing_id
                )))
            }
            Some(row) => row,
        };

        if owned_by == event.reserved_by.raw() {
            return Err(AppError::UnprocessableEntity(
                "hosts cannot reserve their own listing".into(),
            ));
        }

        // overlap probe against non-cancelled reservations:
        //     existing.check_in < new.check_out AND new.check_in < existing.check_out
        let overlap = sqlx::query_as::<_, (Uuid,)>(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE listing_id = $1
                  AND status <> 'cancelled'
                  AND check_in < $3
                  AND $2 < check_out
                LIMIT 1
            "#,
        )
        .bind(event.listing_id.raw())
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if overlap.is_some() {
            return Err(AppError::ResourceConflict(format!(
                "listing {} is already reserved between {} and {}",
                event.listing_id, stay.check_in, stay.check_out
            )));
        }

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, listing_id, reserved_by, check_in, check_out,
                 total_price, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reservation_id.raw())
        .bind(event.listing_id.raw())
        .bind(event.reserved_by.raw())
        .bind(stay.check_in)
        .bind(stay.check_out)
        .bind(stay.total_price(price_per_night))
        .bind(ReservationStatus::Pending.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation_id)
    }

    async fn is_available(&self, listing_id: ListingId, stay: &StayRange) -> AppResult<bool> {
        let listing =
            sqlx::query_as::<_, (Uuid,)>("SELECT listing_id FROM listings WHERE listing_id = $1")
                .bind(listing_id.raw())
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        if listing.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "listing {listing_id} not found"
            )));
        }

        let overlap = sqlx::query_as::<_, (Uuid,)>(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE listing_id = $1
                  AND status <> 'cancelled'
                  AND check_in < $3
                  AND $2 < check_out
                LIMIT 1
            "#,
        )
        .bind(listing_id.raw())
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(overlap.is_none())
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        let row = sqlx::query_as::<_, (String, Uuid, Uuid)>(
            r#"
                SELECT r.status, r.reserved_by, l.owned_by
                FROM reservations AS r
                INNER JOIN listings AS l ON r.listing_id = l.listing_id
                WHERE r.reservation_id = $1
            "#,
        )
        .bind(event.reservation_id.raw())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("reservation {} not found", event.reservation_id))
        })?;

        let (status, reserved_by, owned_by) = row;
        let current = status
            .parse::<ReservationStatus>()
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;

        if !current.can_transition_to(event.status) {
            return Err(AppError::UnprocessableEntity(format!(
                "cannot change a {} reservation to {}",
                current.as_ref(),
                event.status.as_ref()
            )));
        }

        let actor = event.requested_user.raw();
        let permitted = match event.status {
            // only the host decides on confirmation and completion
            ReservationStatus::Confirmed | ReservationStatus::Completed => actor == owned_by,
            // both sides may cancel
            ReservationStatus::Cancelled => actor == owned_by || actor == reserved_by,
            // pending is the initial state, never a transition target
            ReservationStatus::Pending => false,
        };
        if !permitted {
            return Err(AppError::ForbiddenOperation);
        }

        let res = sqlx::query("UPDATE reservations SET status = $2 WHERE reservation_id = $1")
            .bind(event.reservation_id.raw())
            .bind(event.status.as_ref())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                    r.reservation_id,
                    r.listing_id,
                    r.reserved_by,
                    u.user_name AS guest_name,
                    r.check_in,
                    r.check_out,
                    r.total_price,
                    r.status,
                    r.reserved_at,
                    l.title,
                    l.location_id,
                    l.price_per_night,
                    l.owned_by
                FROM reservations AS r
                INNER JOIN listings AS l ON r.listing_id = l.listing_id
                INNER JOIN users AS u ON r.reserved_by = u.user_id
                WHERE r.reservation_id = $1
            "#,
        )
        .bind(reservation_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_all_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                    r.reservation_id,
                    r.listing_id,
                    r.reserved_by,
                    u.user_name AS guest_name,
                    r.check_in,
                    r.check_out,
                    r.total_price,
                    r.status,
                    r.reserved_at,
                    l.title,
                    l.location_id,
                    l.price_per_night,
                    l.owned_by
                FROM reservations AS r
                INNER JOIN listings AS l ON r.listing_id = l.listing_id
                INNER JOIN users AS u ON r.reserved_by = u.user_id
                WHERE r.reserved_by = $1
                ORDER BY r.reserved_at ASC
            "#,
        )
        .bind(user_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn find_all_by_listing_id(&self, listing_id: ListingId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                    r.reservation_id,
                    r.listing_id,
                    r.reserved_by,
                    u.user_name AS guest_name,
                    r.check_in,
                    r.check_out,
                    r.total_price,
                    r.status,
                    r.reserved_at,
                    l.title,
                    l.location_id,
                    l.price_per_night,
                    l.owned_by
                FROM reservations AS r
                INNER JOIN listings AS l ON r.listing_id = l.listing_id
                INNER JOIN users AS u ON r.reserved_by = u.user_id
                WHERE r.listing_id = $1
                ORDER BY r.reserved_at ASC
            "#,
        )
        .bind(listing_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }
}

impl ReservationRepositoryImpl {
    // create and update_status raise their transaction to SERIALIZABLE
    // through this helper
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{listing::ListingRepositoryImpl, user::UserRepositoryImpl};
    use chrono::NaiveDate;
    use kernel::model::{listing::event::CreateListing, user::event::CreateUser};
    use kernel::repository::{listing::ListingRepository, user::UserRepository};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(from: NaiveDate, to: NaiveDate) -> StayRange {
        StayRange::new(from, to).unwrap()
    }

    struct Fixture {
        repo: ReservationRepositoryImpl,
        listing_id: ListingId,
        host: UserId,
        guest: UserId,
    }

    async fn fixture(pool: sqlx::PgPool) -> anyhow::Result<Fixture> {
        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let listings = ListingRepositoryImpl::new(db.clone());

        let host = users
            .create(CreateUser {
                user_name: "Hana".into(),
                email: "hana@example.com".into(),
                password: "passw0rd".into(),
            })
            .await?
            .user_id;
        let guest = users
            .create(CreateUser {
                user_name: "Gil".into(),
                email: "gil@example.com".into(),
                password: "passw0rd".into(),
            })
            .await?
            .user_id;

        let listing_id = listings
            .create(
                CreateListing {
                    title: "Seaside cottage".into(),
                    description: "Two rooms a short walk from the beach".into(),
                    category: "cottage".into(),
                    location_id: "pt-lisbon".into(),
                    price_per_night: 12_000,
                    room_count: 2,
                    bathroom_count: 1,
                    guest_count: 4,
                    image_urls: vec![],
                    amenity_ids: vec![],
                },
                host,
            )
            .await?;

        Ok(Fixture {
            repo: ReservationRepositoryImpl::new(db),
            listing_id,
            host,
            guest,
        })
    }

    #[sqlx::test]
    async fn a_new_reservation_is_pending_and_priced_by_nights(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        let id = f
            .repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await?;

        let reservation = f.repo.find_by_id(id).await?.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.total_price, 4 * 12_000);
        assert_eq!(reservation.stay, stay(date(2024, 6, 1), date(2024, 6, 5)));
        assert_eq!(reservation.guest_name, "Gil");
        assert_eq!(reservation.listing.title, "Seaside cottage");

        Ok(())
    }

    #[sqlx::test]
    async fn overlapping_stays_conflict_but_adjacent_stays_do_not(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        f.repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await?;

        let overlapping = f
            .repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 3), date(2024, 6, 7)),
            ))
            .await;
        assert!(matches!(overlapping, Err(AppError::ResourceConflict(_))));

        // back-to-back stays share a turnover day
        f.repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 5), date(2024, 6, 10)),
            ))
            .await?;

        Ok(())
    }

    #[sqlx::test]
    async fn cancelled_reservations_free_their_dates(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        let first = f
            .repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await?;

        f.repo
            .update_status(UpdateReservationStatus::new(
                first,
                f.guest,
                ReservationStatus::Cancelled,
            ))
            .await?;

        assert!(
            f.repo
                .is_available(f.listing_id, &stay(date(2024, 6, 3), date(2024, 6, 7)))
                .await?
        );
        f.repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 3), date(2024, 6, 7)),
            ))
            .await?;

        Ok(())
    }

    #[sqlx::test]
    async fn hosts_cannot_reserve_their_own_listing(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        let own_booking = f
            .repo
            .create(CreateReservation::new(
                f.listing_id,
                f.host,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await;
        assert!(matches!(
            own_booking,
            Err(AppError::UnprocessableEntity(_))
        ));

        Ok(())
    }

    #[sqlx::test]
    async fn unknown_listings_are_reported_as_missing(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        let missing = f
            .repo
            .create(CreateReservation::new(
                ListingId::new(),
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await;
        assert!(matches!(missing, Err(AppError::EntityNotFound(_))));

        let probe = f
            .repo
            .is_available(ListingId::new(), &stay(date(2024, 6, 1), date(2024, 6, 5)))
            .await;
        assert!(matches!(probe, Err(AppError::EntityNotFound(_))));

        Ok(())
    }

    #[sqlx::test]
    async fn availability_probe_reports_conflicts(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        assert!(
            f.repo
                .is_available(f.listing_id, &stay(date(2024, 6, 1), date(2024, 6, 5)))
                .await?
        );

        f.repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await?;

        assert!(
            !f.repo
                .is_available(f.listing_id, &stay(date(2024, 6, 3), date(2024, 6, 7)))
                .await?
        );
        assert!(
            f.repo
                .is_available(f.listing_id, &stay(date(2024, 6, 5), date(2024, 6, 10)))
                .await?
        );

        Ok(())
    }

    #[sqlx::test]
    async fn status_changes_follow_the_state_machine_and_actor_rules(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let f = fixture(pool).await?;

        let id = f
            .repo
            .create(CreateReservation::new(
                f.listing_id,
                f.guest,
                stay(date(2024, 6, 1), date(2024, 6, 5)),
            ))
            .await?;

        // guests cannot confirm their own booking
        let guest_confirm = f
            .repo
            .update_status(UpdateReservationStatus::new(
                id,
                f.guest,
                ReservationStatus::Confirmed,
            ))
            .await;
        assert!(matches!(guest_confirm, Err(AppError::ForbiddenOperation)));

        // a pending reservation cannot jump straight to completed
        let premature = f
            .repo
            .update_status(UpdateReservationStatus::new(
                id,
                f.host,
                ReservationStatus::Completed,
            ))
            .await;
        assert!(matches!(premature, Err(AppError::UnprocessableEntity(_))));

        f.repo
            .update_status(UpdateReservationStatus::new(
                id,
                f.host,
                ReservationStatus::Confirmed,
            ))
            .await?;
        f.repo
            .update_status(UpdateReservationStatus::new(
                id,
                f.host,
                ReservationStatus::Completed,
            ))
            .await?;

        // completed is terminal
        let after_completion = f
            .repo
            .update_status(UpdateReservationStatus::new(
                id,
                f.host,
                ReservationStatus::Cancelled,
            ))
            .await;
        assert!(matches!(
            after_completion,
            Err(AppError::UnprocessableEntity(_))
        ));

        let reservation = f.repo.find_by_id(id).await?.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Completed);

        Ok(())
    }
}
