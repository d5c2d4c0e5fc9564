use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;
use crate::domain::{LogEntry, Stats};
use crate::observability::DEFAULT_SLOW_PER_PAGE;

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<Stats> {
    Json(state.observability.stats().await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowQuery {
    pub threshold_ms: Option<u64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct SlowResponse {
    pub logs: Vec<LogEntry>,
}

/// Handler for GET /slow — entries strictly above the latency threshold,
/// newest first, paginated.
pub async fn slow_handler(
    State(state): State<AppState>,
    Query(query): Query<SlowQuery>,
) -> Json<SlowResponse> {
    let threshold_ms = query
        .threshold_ms
        .unwrap_or(state.observability.settings().slow_threshold_ms);
    let (page, per_page) = super::normalize_page(query.page, query.per_page, DEFAULT_SLOW_PER_PAGE);

    let logs = state
        .observability
        .slow_requests(threshold_ms, page, per_page)
        .await;
    Json(SlowResponse { logs })
}
