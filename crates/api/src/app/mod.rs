//! HTTP API application wiring (Axum router + session wiring).
//!
//! - `services.rs`: per-client session registry over one shared document store
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, SessionLimits, SharedStore};

/// Build the full HTTP router with default session limits.
pub fn build_app(store: SharedStore) -> Router {
    build_app_with_limits(store, SessionLimits::default())
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app_with_limits(store: SharedStore, limits: SessionLimits) -> Router {
    let services = Arc::new(AppServices::new(store, limits));

    // Session-scoped routes: every request is bound to one isolated document.
    let scoped = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(axum::middleware::from_fn(middleware::session_middleware)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(scoped)
}
