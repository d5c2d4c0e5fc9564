use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;
use crate::domain::LogEntry;
use crate::store::reader::DEFAULT_PER_PAGE;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    pub page: usize,
    pub per_page: usize,
    pub logs: Vec<LogEntry>,
}

/// Handler for GET /logs — paginated history, newest first.
pub async fn logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Json<LogsResponse> {
    let (page, per_page) = super::normalize_page(query.page, query.per_page, DEFAULT_PER_PAGE);
    let logs = state
        .observability
        .read_logs_paginated(page, per_page)
        .await;
    Json(LogsResponse {
        page,
        per_page,
        logs,
    })
}
