use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use garde::Validate;
use kernel::model::user::event::DeleteUser;
use registry::AppRegistry;
use shared::{
    error::{AppError, AppResult},
    response::Envelope,
};

use crate::{
    extractor::AuthorizedUser,
    model::user::{
        CreateUserRequest, UpdateUserPasswordRequest, UpdateUserPasswordRequestWithUserId,
        UserResponse, UsersResponse,
    },
};

// sign-up is the one unauthenticated write
pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let user = registry.user_repository().create(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(UserResponse::from(user))),
    ))
}

pub async fn show_current_user(user: AuthorizedUser) -> Json<Envelope<UserResponse>> {
    Json(Envelope::ok(UserResponse::from(user.user)))
}

pub async fn show_user_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<UsersResponse>>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .user_repository()
        .find_all()
        .await
        .map(UsersResponse::from)
        .map(Envelope::ok)
        .map(Json)
}

pub async fn update_user_password(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateUserPasswordRequest>,
) -> AppResult<Json<Envelope<()>>> {
    req.validate(&())?;

    let update_password = UpdateUserPasswordRequestWithUserId::new(user.id(), req);
    registry
        .user_repository()
        .update_password(update_password.into())
        .await?;

    Ok(Json(Envelope::ok_empty()))
}

pub async fn delete_current_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .user_repository()
        .delete(DeleteUser {
            user_id: user.id(),
        })
        .await?;

    Ok(Json(Envelope::ok_empty()))
}
