pub mod health;
pub mod releases;

use crate::db::ReleaseRepository;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<ReleaseRepository>,
}

impl AppState {
    pub fn new(repo: Arc<ReleaseRepository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/releases",
            get(releases::list_releases).post(releases::create_release),
        )
        .route(
            "/releases/:id",
            get(releases::get_release)
                .put(releases::update_release)
                .delete(releases::delete_release),
        )
        .layer(cors)
        .with_state(state)
}
