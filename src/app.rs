//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{ConnectionPool, SessionSettings},
    handlers, middleware,
};

/// State handed to the connection middleware.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: ConnectionPool,
    pub session: Arc<SessionSettings>,
}

impl AppState {
    pub fn new(pool: ConnectionPool, session: SessionSettings) -> Self {
        Self {
            pool,
            session: Arc::new(session),
        }
    }
}

/// Build the HTTP router.
///
/// Every route, including `/`, runs inside the connection middleware and so
/// holds exactly one pooled connection while its handler runs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root::index))
        // User routes
        .route("/register", post(handlers::users::register))
        .route("/log-in", post(handlers::users::log_in))
        // Car routes
        .route(
            "/car",
            get(handlers::cars::list_cars)
                .post(handlers::cars::create_car)
                .put(handlers::cars::update_car),
        )
        .route("/car/{id}", delete(handlers::cars::delete_car))
        // Acquire, configure and release a connection around every request
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::connection::connection_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
