use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use vakt::app::router::observability_router;
use vakt::app::server::serve;
use vakt::app::state::AppState;
use vakt::app::tracing::init_tracing;
use vakt::error::ObservabilityError;
use vakt::middleware::track_requests;

#[tokio::main]
async fn main() -> Result<(), ObservabilityError> {
    // Handle healthcheck subcommand (for container healthchecks)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match vakt::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Healthcheck failed: {}", e);
                std::process::exit(1)
            }
        }
    }

    init_tracing();

    let settings = vakt::get_configuration()
        .map_err(|e| ObservabilityError::Config(e.to_string()))?;
    info!("Loaded settings");

    let state = AppState::from_settings(&settings);

    let app = Router::new()
        .nest("/observability", observability_router(state.clone()))
        .merge(demo_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ));

    info!("Endpoints:");
    info!("  - GET    /observability/health                 (health check)");
    info!("  - GET    /observability/stats                  (aggregate stats)");
    info!("  - GET    /observability/slow                   (slow requests)");
    info!("  - GET    /observability/logs                   (paginated history)");
    info!("  - POST   /observability/snapshots              (create snapshot)");
    info!("  - GET    /observability/snapshots              (list snapshots)");
    info!("  - GET    /observability/snapshots/{{id}}         (fetch snapshot)");
    info!("  - GET    /observability/snapshots/{{id}}/export  (download snapshot)");
    info!("  - DELETE /observability/snapshots/{{id}}         (delete snapshot)");

    serve(app, settings.http_port).await
}

/// Demo responders exercising the capture middleware: a fast success, a
/// slow success and an error.
fn demo_router() -> Router {
    Router::new()
        .route(
            "/demo/ok",
            get(|| async { Json(json!({"message": "ok"})) }),
        )
        .route(
            "/demo/slow",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
                Json(json!({"message": "responded after 1000ms"}))
            }),
        )
        .route(
            "/demo/error",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "simulated failure"})),
                )
            }),
        )
}
