//! Axum application wiring.

use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;

use super::routes;

/// State shared by every route handler.
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: ServerDeps,
    pub db_pool: PgPool,
    pub nats: async_nats::Client,
}

/// Build the axum router for the read API and streaming endpoints.
pub fn build_app(state: AxumAppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_handler))
        .route(
            "/api/companies/:company_id/notifications",
            get(routes::notifications::list_handler),
        )
        .route(
            "/api/notifications/:id/read",
            post(routes::notifications::mark_read_handler),
        )
        .route(
            "/api/streams/companies/:company_id",
            get(routes::stream::company_stream_handler),
        )
        .route(
            "/api/streams/broadcast",
            get(routes::stream::broadcast_stream_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
