use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{ListingId, UserId},
        listing::Listing,
    },
    repository::favorite::FavoriteRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{model::listing::ListingRow, ConnectionPool};

use super::{is_foreign_key_violation, listing::find_amenities_by_listing_ids};

#[derive(new)]
pub struct FavoriteRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl FavoriteRepository for FavoriteRepositoryImpl {
    async fn add(&self, user_id: UserId, listing_id: ListingId) -> AppResult<()> {
        // re-favoriting is a no-op
        sqlx::query(
            r#"
                INSERT INTO favorites (user_id, listing_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.raw())
        .bind(listing_id.raw())
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::EntityNotFound(format!("listing {listing_id} not found"))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        Ok(())
    }

    async fn remove(&self, user_id: UserId, listing_id: ListingId) -> AppResult<()> {
        // removing an absent favorite leaves the set in the requested state
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id.raw())
            .bind(listing_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_all_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Listing>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
                SELECT
                    l.listing_id,
                    l.title,
                    l.description,
                    l.category,
                    l.location_id,
                    l.price_per_night,
                    l.room_count,
                    l.bathroom_count,
                    l.guest_count,
                    l.image_urls,
                    l.owned_by,
                    u.user_name AS owner_name
                FROM favorites AS f
                INNER JOIN listings AS l ON f.listing_id = l.listing_id
                INNER JOIN users AS u ON l.owned_by = u.user_id
                WHERE f.user_id = $1
                ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.listing_id).collect();
        let mut amenities = find_amenities_by_listing_ids(&self.db, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let listing_amenities = amenities.remove(&row.listing_id).unwrap_or_default();
                row.into_listing(listing_amenities)
            })
            .collect())
    }
}
