use axum::{extract::State, Json};
use kernel::model::auth::event::CreateToken;
use registry::AppRegistry;
use shared::{error::AppResult, response::Envelope};

use crate::{
    extractor::AuthorizedUser,
    model::auth::{AccessTokenResponse, LoginRequest},
};

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<Envelope<AccessTokenResponse>>> {
    let user_id = registry
        .auth_repository()
        .verify_user(&req.email, &req.password)
        .await?;

    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;

    Ok(Json(Envelope::ok(AccessTokenResponse {
        user_id,
        access_token: access_token.0,
    })))
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Envelope<()>>> {
    registry
        .auth_repository()
        .delete_token(user.access_token)
        .await?;

    Ok(Json(Envelope::ok_empty()))
}
