use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::locations::handlers::{import_handler, location_handler};
use crate::features::locations::services::{ImportService, LocationService};

/// Create routes for the locations feature
pub fn routes(
    location_service: Arc<LocationService>,
    import_service: Arc<ImportService>,
) -> Router {
    let reads = Router::new()
        .route("/locations", get(location_handler::list_locations))
        .route("/locations/{id}", get(location_handler::get_location))
        .route(
            "/ip_address/{ip_address}",
            get(location_handler::get_by_ip_address),
        )
        .with_state(location_service);

    let import = Router::new()
        .route("/import_data", post(import_handler::import_data))
        .with_state(import_service);

    reads.merge(import)
}
