use axum::Router;
use tower_http::cors::CorsLayer;

use crate::errors::AppError;
use crate::routes::{analytics, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/analytics", analytics::router())
        .fallback(|| async { AppError::NotFound })
        .layer(CorsLayer::permissive())
        .with_state(state)
}
