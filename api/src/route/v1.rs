use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, health::build_health_check_routers, listing::build_listing_routers,
    reservation::build_reservation_routers, review::build_review_routers, user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_listing_routers())
        .merge(build_reservation_routers())
        .merge(build_review_routers());

    Router::new().nest("/api/v1", router)
}
