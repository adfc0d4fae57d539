use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        auth::{event::CreateToken, AccessToken},
        id::UserId,
    },
    repository::auth::AuthRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::{
    database::ConnectionPool,
    redis::{
        model::{AuthorizationKey, AuthorizedUserId},
        RedisClient,
    },
};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[derive(sqlx::FromRow)]
struct UserItem {
    user_id: Uuid,
    password_hash: String,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key: AuthorizationKey = access_token.into();
        self.kv
            .get(&key)
            .await
            .map(|x| x.map(AuthorizedUserId::into_inner))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let user_item = sqlx::query_as::<_, UserItem>(
            "SELECT user_id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or(AppError::UnauthenticatedError)?;

        let valid = bcrypt::verify(password, &user_item.password_hash)?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }

        Ok(UserId::from(user_item.user_id))
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let access_token = AccessToken(Uuid::new_v4().simple().to_string());
        let key: AuthorizationKey = (&access_token).into();
        self.kv
            .set_ex(&key, &AuthorizedUserId::new(event.user_id), self.ttl)
            .await?;
        Ok(access_token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        let key: AuthorizationKey = (&access_token).into();
        self.kv.delete(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::UserRepositoryImpl;
    use kernel::model::user::event::CreateUser;
    use kernel::repository::user::UserRepository;
    use shared::config::RedisConfig;

    // Connecting lazily means the client can be built without a live Redis;
    // verify_user only touches Postgres and bcrypt.
    fn dummy_kv() -> Arc<RedisClient> {
        let config = RedisConfig {
            host: "localhost".into(),
            port: 6379,
        };
        Arc::new(RedisClient::new(&config).unwrap())
    }

    #[sqlx::test]
    async fn verify_user_checks_the_stored_hash(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let user = users
            .create(CreateUser {
                user_name: "Nora".into(),
                email: "nora@example.com".into(),
                password: "correct horse".into(),
            })
            .await?;

        let repo = AuthRepositoryImpl::new(db, dummy_kv(), 60);

        let verified = repo.verify_user("nora@example.com", "correct horse").await?;
        assert_eq!(verified, user.user_id);

        let wrong_password = repo.verify_user("nora@example.com", "battery staple").await;
        assert!(matches!(
            wrong_password,
            Err(AppError::UnauthenticatedError)
        ));

        let unknown_user = repo.verify_user("nobody@example.com", "correct horse").await;
        assert!(matches!(unknown_user, Err(AppError::UnauthenticatedError)));

        Ok(())
    }
}
