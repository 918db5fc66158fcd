use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;
use vet_cell::router::vet_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Pet Care Clinic API is running!" }))
        .nest("/vets", vet_routes(state))
}
