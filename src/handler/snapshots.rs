use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::app::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSnapshotRequest {
    pub name: Option<String>,
}

/// Handler for POST /snapshots — create a point-in-time artifact.
pub async fn create_snapshot_handler(
    State(state): State<AppState>,
    body: Option<Json<CreateSnapshotRequest>>,
) -> Response {
    let name = body.and_then(|Json(request)| request.name);
    match state.observability.create_snapshot(name).await {
        Ok(metadata) => (StatusCode::CREATED, Json(metadata)).into_response(),
        Err(e) => {
            error!("Failed to create snapshot: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to create snapshot",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Handler for GET /snapshots — metadata for every artifact, newest first.
pub async fn list_snapshots_handler(State(state): State<AppState>) -> Response {
    Json(state.observability.list_snapshots().await).into_response()
}

/// Handler for GET /snapshots/{id} — full artifact, resolved by id or name.
pub async fn get_snapshot_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.observability.get_snapshot(&id).await {
        Some(document) => Json(document).into_response(),
        None => snapshot_not_found(),
    }
}

/// Handler for DELETE /snapshots/{id}
pub async fn delete_snapshot_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    if state.observability.delete_snapshot(&id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        snapshot_not_found()
    }
}

/// Handler for GET /snapshots/{id}/export — the artifact as a download.
pub async fn export_snapshot_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.observability.export_snapshot(&id).await {
        Some((body, filename)) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={filename}"),
                ),
            ],
            body,
        )
            .into_response(),
        None => snapshot_not_found(),
    }
}

fn snapshot_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Snapshot not found"})),
    )
        .into_response()
}
