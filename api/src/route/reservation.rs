use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    show_reservation, show_reservation_list, update_reservation_status,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", get(show_reservation_list))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/status", put(update_reservation_status));

    Router::new().nest("/reservations", reservation_routers)
}
