use axum::{
    Router,
    routing::{get, post, put},
};

pub mod items;
pub mod requests;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(system::metrics))
        .route("/reset", post(system::reset))
        .route("/refresh", post(system::refresh))
        .route("/items", get(items::list_items))
        .route("/items/quantity", put(items::update_quantity))
        .route("/items/export", get(items::export_stock))
        .nest("/requests", requests::router())
}
