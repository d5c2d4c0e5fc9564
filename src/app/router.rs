use axum::Router;
use axum::routing::{get, post};

use crate::app::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::logs::logs_handler;
use crate::handler::snapshots::{
    create_snapshot_handler, delete_snapshot_handler, export_snapshot_handler,
    get_snapshot_handler, list_snapshots_handler,
};
use crate::handler::stats::{slow_handler, stats_handler};

/// Build the observability query router.
///
/// The host nests this under its own prefix (conventionally
/// `/observability`, which the default ignore paths exclude from capture).
pub fn observability_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/slow", get(slow_handler))
        .route("/logs", get(logs_handler))
        .route(
            "/snapshots",
            post(create_snapshot_handler).get(list_snapshots_handler),
        )
        .route(
            "/snapshots/{id}",
            get(get_snapshot_handler).delete(delete_snapshot_handler),
        )
        .route("/snapshots/{id}/export", get(export_snapshot_handler))
        .with_state(state)
}
