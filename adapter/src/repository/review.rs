use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{ListingId, ReviewId},
        review::{
            event::{CreateReview, DeleteReview},
            Review,
        },
    },
    repository::review::ReviewRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{model::review::ReviewRow, ConnectionPool};

use super::{is_foreign_key_violation, is_unique_violation};

#[derive(new)]
pub struct ReviewRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId> {
        let review_id = ReviewId::new();
        sqlx::query(
            r#"
                INSERT INTO reviews (review_id, listing_id, reviewed_by, rating, comment)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review_id.raw())
        .bind(event.listing_id.raw())
        .bind(event.reviewed_by.raw())
        .bind(event.rating)
        .bind(&event.comment)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            // the (listing_id, reviewed_by) unique constraint caps reviews at
            // one per pair
            if is_unique_violation(&e) {
                AppError::ResourceConflict(format!(
                    "listing {} has already been reviewed by this user",
                    event.listing_id
                ))
            } else if is_foreign_key_violation(&e) {
                AppError::EntityNotFound(format!("listing {} not found", event.listing_id))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        Ok(review_id)
    }

    async fn find_all_by_listing_id(&self, listing_id: ListingId) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
                SELECT
                    rv.review_id,
                    rv.listing_id,
                    rv.reviewed_by,
                    u.user_name AS reviewer_name,
                    rv.rating,
                    rv.comment,
                    rv.created_at
                FROM reviews AS rv
                INNER JOIN users AS u ON rv.reviewed_by = u.user_id
                WHERE rv.listing_id = $1
                ORDER BY rv.created_at DESC
            "#,
        )
        .bind(listing_id.raw())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn delete(&self, event: DeleteReview) -> AppResult<()> {
        let reviewed_by =
            sqlx::query_as::<_, (Uuid,)>("SELECT reviewed_by FROM reviews WHERE review_id = $1")
                .bind(event.review_id.raw())
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?
                .ok_or_else(|| {
                    AppError::EntityNotFound(format!("review {} not found", event.review_id))
                })?
                .0;

        if reviewed_by != event.requested_user.raw() {
            return Err(AppError::ForbiddenOperation);
        }

        let res = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(event.review_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no review record has been deleted".into(),
            ));
        }

        Ok(())
    }
}
