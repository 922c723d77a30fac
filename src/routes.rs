use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    create_booking, get_join_info, get_status, mark_host_joined, AppState,
};
use crate::handlers::page::waiting_room_page;
use crate::handlers::test::{health_check, test_booking};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Waiting room API and page are always available
    let waiting_room_routes = Router::new()
        .route("/api/waiting-room/:booking_uid/status", get(get_status))
        .route(
            "/api/waiting-room/:booking_uid/join-info",
            get(get_join_info),
        )
        .route(
            "/api/waiting-room/:booking_uid/host-joined",
            post(mark_host_joined),
        )
        .route("/waiting-room/:booking_uid", get(waiting_room_page));
    router = router.merge(waiting_room_routes);

    // Only add seeding and sample routes if not in production mode
    if !is_production {
        let dev_routes = Router::new()
            .route("/bookings", post(create_booking))
            .route("/test-booking", get(test_booking));

        router = router.merge(dev_routes);

        info!("Booking seed routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - only waiting room and health endpoints exposed");
    }

    router.with_state(app_state)
}
