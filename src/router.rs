use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{transactions, ws};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            post(transactions::create_transaction).get(transactions::list_transactions),
        )
        .route("/ws/monitor", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
