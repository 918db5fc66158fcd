use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;

use crate::handlers::{self, VetCellState};

pub fn vet_routes(config: Arc<AppConfig>) -> Router {
    vet_routes_with_state(Arc::new(VetCellState::from_config(&config)))
}

pub fn vet_routes_with_state(state: Arc<VetCellState>) -> Router {
    Router::new()
        // Listings
        .route("/", get(handlers::list_veterinarians))
        .route("/details", get(handlers::list_veterinarians_with_details))
        .route("/specializations", get(handlers::get_specializations))
        .route("/specializations/breakdown", get(handlers::get_specialization_breakdown))
        .route("/specializations/{specialization}", get(handlers::get_veterinarians_by_specialization))

        // Availability search
        .route("/available", get(handlers::find_available_veterinarians))
        .with_state(state)
}
