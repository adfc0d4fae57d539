use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::{AmenityId, ListingId, UserId},
        list::{ListOptions, PaginatedList},
        listing::{
            event::{CreateListing, DeleteListing, UpdateListing},
            Amenity, Listing, ListingFilter,
        },
    },
    repository::listing::ListingRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{
    model::listing::{AmenityRow, ListingAmenityRow, ListingRow, PaginatedListingRow},
    ConnectionPool,
};

use super::is_foreign_key_violation;

#[derive(new)]
pub struct ListingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ListingRepository for ListingRepositoryImpl {
    async fn create(&self, event: CreateListing, owner_id: UserId) -> AppResult<ListingId> {
        let mut tx = self.db.begin().await?;

        let listing_id = ListingId::new();
        sqlx::query(
            r#"
                INSERT INTO listings
                (listing_id, title, description, category, location_id,
                 price_per_night, room_count, bathroom_count, guest_count,
                 image_urls, owned_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(listing_id.raw())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.location_id)
        .bind(event.price_per_night)
        .bind(event.room_count)
        .bind(event.bathroom_count)
        .bind(event.guest_count)
        .bind(&event.image_urls)
        .bind(owner_id.raw())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if !event.amenity_ids.is_empty() {
            let amenity_ids: Vec<Uuid> = event.amenity_ids.iter().map(AmenityId::raw).collect();
            link_amenities(&mut tx, listing_id.raw(), &amenity_ids).await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(listing_id)
    }

    async fn find_all(
        &self,
        filter: ListingFilter,
        options: ListOptions,
    ) -> AppResult<PaginatedList<Listing>> {
        let ListOptions { limit, offset } = options;

        // page of ids plus the window total, then a second query for the rows
        let rows = sqlx::query_as::<_, PaginatedListingRow>(
            r#"
                SELECT COUNT(*) OVER() AS total, listing_id
                FROM listings
                WHERE ($1::varchar IS NULL OR category = $1)
                  AND ($2::varchar IS NULL OR location_id = $2)
                  AND ($3::bigint IS NULL OR price_per_night >= $3)
                  AND ($4::bigint IS NULL OR price_per_night <= $4)
                  AND ($5::int IS NULL OR guest_count >= $5)
                ORDER BY created_at DESC
                LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.location_id.as_deref())
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.guest_count)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let total = rows.first().map(|r| r.total).unwrap_or_default();
        let ids: Vec<Uuid> = rows.into_iter().map(|r| r.listing_id).collect();

        let items = self.find_by_ids(&ids).await?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_by_id(&self, listing_id: ListingId) -> AppResult<Option<Listing>> {
        let mut listings = self.find_by_ids(&[listing_id.raw()]).await?;
        Ok(listings.pop())
    }

    async fn update(&self, event: UpdateListing) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        self.check_ownership(&mut tx, event.listing_id, event.requested_user)
            .await?;

        let res = sqlx::query(
            r#"
                UPDATE listings
                SET title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    category = COALESCE($4, category),
                    location_id = COALESCE($5, location_id),
                    price_per_night = COALESCE($6, price_per_night),
                    room_count = COALESCE($7, room_count),
                    bathroom_count = COALESCE($8, bathroom_count),
                    guest_count = COALESCE($9, guest_count),
                    image_urls = COALESCE($10, image_urls)
                WHERE listing_id = $1
            "#,
        )
        .bind(event.listing_id.raw())
        .bind(event.title)
        .bind(event.description)
        .bind(event.category)
        .bind(event.location_id)
        .bind(event.price_per_night)
        .bind(event.room_count)
        .bind(event.bathroom_count)
        .bind(event.guest_count)
        .bind(event.image_urls)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no listing record has been updated".into(),
            ));
        }

        // replacing the amenity set rather than diffing it
        if let Some(amenity_ids) = event.amenity_ids {
            sqlx::query("DELETE FROM listing_amenities WHERE listing_id = $1")
                .bind(event.listing_id.raw())
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

            if !amenity_ids.is_empty() {
                let amenity_ids: Vec<Uuid> = amenity_ids.iter().map(AmenityId::raw).collect();
                link_amenities(&mut tx, event.listing_id.raw(), &amenity_ids).await?;
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteListing) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        self.check_ownership(&mut tx, event.listing_id, event.requested_user)
            .await?;

        let res = sqlx::query("DELETE FROM listings WHERE listing_id = $1")
            .bind(event.listing_id.raw())
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no listing record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_all_amenities(&self) -> AppResult<Vec<Amenity>> {
        let rows = sqlx::query_as::<_, AmenityRow>(
            r#"
                SELECT amenity_id, name, category
                FROM amenities
                ORDER BY category ASC, name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Amenity::from).collect())
    }
}

impl ListingRepositoryImpl {
    async fn check_ownership(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        listing_id: ListingId,
        requested_user: UserId,
    ) -> AppResult<()> {
        let owned_by =
            sqlx::query_as::<_, (Uuid,)>("SELECT owned_by FROM listings WHERE listing_id = $1")
                .bind(listing_id.raw())
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?
                .ok_or_else(|| AppError::EntityNotFound(format!("listing {listing_id} not found")))?
                .0;

        if owned_by != requested_user.raw() {
            return Err(AppError::ForbiddenOperation);
        }

        Ok(())
    }

    pub(crate) async fn find_by_ids(&self, listing_ids: &[Uuid]) -> AppResult<Vec<Listing>> {
        if listing_ids.is_empty() {
            return Ok(Vec::new());
        }

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
                FROM listings AS l
                INNER JOIN users AS u ON l.owned_by = u.user_id
                WHERE l.listing_id = ANY($1)
                ORDER BY l.created_at DESC
            "#,
        )
        .bind(listing_ids.to_vec())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut amenities = find_amenities_by_listing_ids(&self.db, listing_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let listing_amenities = amenities.remove(&row.listing_id).unwrap_or_default();
                row.into_listing(listing_amenities)
            })
            .collect())
    }
}

async fn link_amenities(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    listing_id: Uuid,
    amenity_ids: &[Uuid],
) -> AppResult<()> {
    sqlx::query(
        r#"
            INSERT INTO listing_amenities (listing_id, amenity_id)
            SELECT $1, unnest($2::uuid[])
        "#,
    )
    .bind(listing_id)
    .bind(amenity_ids.to_vec())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::UnprocessableEntity("unknown amenity id".into())
        } else {
            AppError::SpecificOperationError(e)
        }
    })?;

    Ok(())
}

// Shared with the favorites repository, which renders the same listing shape.
pub(crate) async fn find_amenities_by_listing_ids(
    db: &ConnectionPool,
    listing_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<Amenity>>> {
    let rows = sqlx::query_as::<_, ListingAmenityRow>(
        r#"
            SELECT la.listing_id, a.amenity_id, a.name, a.category
            FROM listing_amenities AS la
            INNER JOIN amenities AS a ON la.amenity_id = a.amenity_id
            WHERE la.listing_id = ANY($1)
            ORDER BY a.name ASC
        "#,
    )
    .bind(listing_ids.to_vec())
    .fetch_all(db.inner_ref())
    .await
    .map_err(AppError::SpecificOperationError)?;

    let mut map: HashMap<Uuid, Vec<Amenity>> = HashMap::new();
    for row in rows {
        map.entry(row.listing_id).or_default().push(Amenity {
            id: AmenityId::from(row.amenity_id),
            name: row.name,
            category: row.category,
        });
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::UserRepositoryImpl;
    use kernel::model::user::event::CreateUser;
    use kernel::repository::user::UserRepository;

    async fn create_user(db: &ConnectionPool, name: &str, email: &str) -> anyhow::Result<UserId> {
        let users = UserRepositoryImpl::new(db.clone());
        let user = users
            .create(CreateUser {
                user_name: name.into(),
                email: email.into(),
                password: "passw0rd".into(),
            })
            .await?;
        Ok(user.user_id)
    }

    fn new_listing(title: &str, category: &str, price: i64, guests: i32) -> CreateListing {
        CreateListing {
            title: title.into(),
            description: "A place to stay".into(),
            category: category.into(),
            location_id: "pt-lisbon".into(),
            price_per_night: price,
            room_count: 2,
            bathroom_count: 1,
            guest_count: guests,
            image_urls: vec![],
            amenity_ids: vec![],
        }
    }

    #[sqlx::test]
    async fn listing_round_trips_with_amenities(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ListingRepositoryImpl::new(db.clone());
        let owner_id = create_user(&db, "Olu", "olu@example.com").await?;

        let seeded = repo.find_all_amenities().await?;
        assert!(!seeded.is_empty());
        let picked: Vec<AmenityId> = seeded.iter().take(2).map(|a| a.id).collect();

        let mut event = new_listing("City loft", "apartment", 9_500, 3);
        event.image_urls = vec![
            "https://img.example.com/loft-1.jpg".into(),
            "https://img.example.com/loft-2.jpg".into(),
        ];
        event.amenity_ids = picked.clone();

        let listing_id = repo.create(event, owner_id).await?;
        let listing = repo.find_by_id(listing_id).await?.unwrap();

        assert_eq!(listing.title, "City loft");
        assert_eq!(listing.price_per_night, 9_500);
        assert_eq!(listing.image_urls.len(), 2);
        assert_eq!(listing.owner.owner_name, "Olu");
        let mut amenity_ids: Vec<AmenityId> = listing.amenities.iter().map(|a| a.id).collect();
        let mut expected = picked;
        amenity_ids.sort_by_key(AmenityId::raw);
        expected.sort_by_key(AmenityId::raw);
        assert_eq!(amenity_ids, expected);

        Ok(())
    }

    #[sqlx::test]
    async fn only_the_owner_may_update_or_delete(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ListingRepositoryImpl::new(db.clone());
        let owner_id = create_user(&db, "Mai", "mai@example.com").await?;
        let stranger_id = create_user(&db, "Sol", "sol@example.com").await?;

        let listing_id = repo
            .create(new_listing("Cabin", "cabin", 7_000, 2), owner_id)
            .await?;

        let update = UpdateListing {
            listing_id,
            requested_user: stranger_id,
            title: Some("Taken over".into()),
            description: None,
            category: None,
            location_id: None,
            price_per_night: None,
            room_count: None,
            bathroom_count: None,
            guest_count: None,
            image_urls: None,
            amenity_ids: None,
        };
        assert!(matches!(
            repo.update(update).await,
            Err(AppError::ForbiddenOperation)
        ));

        assert!(matches!(
            repo.delete(DeleteListing {
                listing_id,
                requested_user: stranger_id,
            })
            .await,
            Err(AppError::ForbiddenOperation)
        ));

        let update = UpdateListing {
            listing_id,
            requested_user: owner_id,
            title: None,
            description: None,
            category: None,
            location_id: None,
            price_per_night: Some(8_000),
            room_count: None,
            bathroom_count: None,
            guest_count: None,
            image_urls: None,
            amenity_ids: None,
        };
        repo.update(update).await?;
        let listing = repo.find_by_id(listing_id).await?.unwrap();
        assert_eq!(listing.price_per_night, 8_000);
        assert_eq!(listing.title, "Cabin");

        repo.delete(DeleteListing {
            listing_id,
            requested_user: owner_id,
        })
        .await?;
        assert!(repo.find_by_id(listing_id).await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn search_filters_and_paginates(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ListingRepositoryImpl::new(db.clone());
        let owner_id = create_user(&db, "Rae", "rae@example.com").await?;

        repo.create(new_listing("Loft", "apartment", 9_000, 2), owner_id)
            .await?;
        repo.create(new_listing("Villa", "villa", 40_000, 8), owner_id)
            .await?;
        repo.create(new_listing("Studio", "apartment", 6_000, 2), owner_id)
            .await?;

        let filter = ListingFilter {
            category: Some("apartment".into()),
            ..Default::default()
        };
        let page = repo
            .find_all(
                filter,
                ListOptions {
                    limit: 20,
                    offset: 0,
                },
            )
            .await?;
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|l| l.category == "apartment"));

        let filter = ListingFilter {
            min_price: Some(10_000),
            ..Default::default()
        };
        let page = repo
            .find_all(
                filter,
                ListOptions {
                    limit: 20,
                    offset: 0,
                },
            )
            .await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Villa");

        let page = repo
            .find_all(
                ListingFilter::default(),
                ListOptions {
                    limit: 2,
                    offset: 0,
                },
            )
            .await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);

        Ok(())
    }
}
