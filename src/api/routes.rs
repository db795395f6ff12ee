/*
 * Responsibility
 * - URL structure of the service
 * - public: reachable without a token; protected: wrapped by the access stage in app.rs
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    health::health,
    inventory::{add_inventory, view_inventory},
    users::{login, signup},
};
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/inventory", get(view_inventory).post(add_inventory))
}
