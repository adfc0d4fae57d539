use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    favorite::show_favorite_list,
    user::{
        delete_current_user, register_user, show_current_user, show_user_list,
        update_user_password,
    },
};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", post(register_user))
        .route("/", get(show_user_list))
        .route("/me", get(show_current_user))
        .route("/me", delete(delete_current_user))
        .route("/me/password", put(update_user_password))
        .route("/me/favorites", get(show_favorite_list));

    Router::new().nest("/users", user_routers)
}
