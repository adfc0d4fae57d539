use axum::{routing::delete, Router};
use registry::AppRegistry;

use crate::handler::review::delete_review;

pub fn build_review_routers() -> Router<AppRegistry> {
    let review_routers = Router::new().route("/:review_id", delete(delete_review));

    Router::new().nest("/reviews", review_routers)
}
