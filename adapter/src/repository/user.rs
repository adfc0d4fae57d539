use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::UserId,
        role::Role,
        user::{
            event::{CreateUser, DeleteUser, UpdateUserPassword},
            User,
        },
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

use super::is_unique_violation;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        sqlx::query(
            r#"
                INSERT INTO users (user_id, user_name, email, password_hash, role)
                VALUES ($1, $2, $3, $4, 'user')
            "#,
        )
        .bind(user_id.raw())
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(&hashed_password)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::ResourceConflict(format!("email {} is already registered", event.email))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        Ok(User {
            user_id,
            user_name: event.user_name,
            email: event.email,
            role: Role::User,
        })
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, user_name, email, role
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(current_user_id.raw())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, user_name, email, role
                FROM users
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let original_password_hash =
            sqlx::query_as::<_, (String,)>("SELECT password_hash FROM users WHERE user_id = $1")
                .bind(event.user_id.raw())
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?
                .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?
                .0;

        let valid = bcrypt::verify(&event.current_password, &original_password_hash)?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }

        let new_password_hash = bcrypt::hash(&event.new_password, bcrypt::DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(event.user_id.raw())
            .bind(&new_password_hash)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        // listings, reservations, reviews and favorites go with the user
        // (ON DELETE CASCADE)
        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(event.user_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        favorite::FavoriteRepositoryImpl, listing::ListingRepositoryImpl,
        reservation::ReservationRepositoryImpl, review::ReviewRepositoryImpl,
    };
    use chrono::NaiveDate;
    use kernel::model::{
        listing::event::CreateListing,
        reservation::{event::CreateReservation, StayRange},
        review::event::CreateReview,
    };
    use kernel::repository::{
        favorite::FavoriteRepository, listing::ListingRepository,
        reservation::ReservationRepository, review::ReviewRepository,
    };

    fn new_user(name: &str, email: &str) -> CreateUser {
        CreateUser {
            user_name: name.into(),
            email: email.into(),
            password: "passw0rd".into(),
        }
    }

    fn cottage() -> CreateListing {
        CreateListing {
            title: "Seaside cottage".into(),
            description: "Two rooms a short walk from the beach".into(),
            category: "cottage".into(),
            location_id: "pt-lisbon".into(),
            price_per_night: 12_000,
            room_count: 2,
            bathroom_count: 1,
            guest_count: 4,
            image_urls: vec!["https://img.example.com/cottage.jpg".into()],
            amenity_ids: vec![],
        }
    }

    #[sqlx::test]
    async fn duplicate_emails_conflict(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(new_user("Ada", "ada@example.com")).await?;
        let second = repo.create(new_user("Ada again", "ada@example.com")).await;

        assert!(matches!(second, Err(AppError::ResourceConflict(_))));

        Ok(())
    }

    #[sqlx::test]
    async fn deleting_a_user_cascades_to_everything_they_own(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let listings = ListingRepositoryImpl::new(db.clone());
        let reservations = ReservationRepositoryImpl::new(db.clone());
        let reviews = ReviewRepositoryImpl::new(db.clone());
        let favorites = FavoriteRepositoryImpl::new(db.clone());

        let host = users.create(new_user("Hana", "hana@example.com")).await?;
        let guest = users.create(new_user("Gil", "gil@example.com")).await?;

        let listing_id = listings.create(cottage(), host.user_id).await?;

        let stay = StayRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        )?;
        let reservation_id = reservations
            .create(CreateReservation::new(listing_id, guest.user_id, stay))
            .await?;

        reviews
            .create(CreateReview::new(
                listing_id,
                guest.user_id,
                5,
                Some("Lovely place".into()),
            ))
            .await?;
        favorites.add(guest.user_id, listing_id).await?;

        // removing the host takes the listing and its dependents along
        users
            .delete(DeleteUser {
                user_id: host.user_id,
            })
            .await?;

        assert!(users.find_current_user(host.user_id).await?.is_none());
        assert!(listings.find_by_id(listing_id).await?.is_none());
        assert!(reservations.find_by_id(reservation_id).await?.is_none());
        assert!(reservations
            .find_all_by_user_id(guest.user_id)
            .await?
            .is_empty());
        assert!(favorites
            .find_all_by_user_id(guest.user_id)
            .await?
            .is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn password_updates_require_the_current_password(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));
        let user = repo.create(new_user("Pia", "pia@example.com")).await?;

        let rejected = repo
            .update_password(UpdateUserPassword {
                user_id: user.user_id,
                current_password: "not the password".into(),
                new_password: "next".into(),
            })
            .await;
        assert!(matches!(rejected, Err(AppError::UnauthenticatedError)));

        repo.update_password(UpdateUserPassword {
            user_id: user.user_id,
            current_password: "passw0rd".into(),
            new_password: "n3w-passw0rd".into(),
        })
        .await?;

        Ok(())
    }
}
