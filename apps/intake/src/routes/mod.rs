pub mod auth;
pub mod health;
pub mod orders;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/telegram/webhook", post(webhook::handle_webhook))
        // Advisory order log (read-only)
        .route("/api/v1/orders", get(orders::handle_list_orders))
        .route("/api/v1/orders/:id", get(orders::handle_get_order))
        .with_state(state)
}
