use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    favorite::{add_favorite, remove_favorite},
    listing::{
        delete_listing, register_listing, show_amenity_list, show_listing, show_listing_list,
        update_listing,
    },
    reservation::{check_availability, reserve_listing, show_listing_reservations},
    review::{register_review, show_review_list},
};

pub fn build_listing_routers() -> Router<AppRegistry> {
    let listing_routers = Router::new()
        .route("/", post(register_listing))
        .route("/", get(show_listing_list))
        .route("/:listing_id", get(show_listing))
        .route("/:listing_id", put(update_listing))
        .route("/:listing_id", delete(delete_listing))
        .route("/:listing_id/availability", get(check_availability))
        .route("/:listing_id/reservations", post(reserve_listing))
        .route("/:listing_id/reservations", get(show_listing_reservations))
        .route("/:listing_id/reviews", post(register_review))
        .route("/:listing_id/reviews", get(show_review_list))
        .route("/:listing_id/favorite", put(add_favorite))
        .route("/:listing_id/favorite", delete(remove_favorite));

    let amenity_routers = Router::new().route("/", get(show_amenity_list));

    Router::new()
        .nest("/listings", listing_routers)
        .nest("/amenities", amenity_routers)
}
