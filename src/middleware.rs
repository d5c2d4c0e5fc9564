use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app::state::AppState;

/// Capture middleware for axum hosts: opens a span before the inner handler
/// runs and completes it with the response status. Requests whose path
/// matches an ignored prefix pass through untracked.
///
/// Wire with `axum::middleware::from_fn_with_state(state, track_requests)`.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if state.observability.should_ignore(&path) {
        return next.run(request).await;
    }

    let span = state
        .observability
        .start_span(request.method().as_str(), path.as_str());
    let response = next.run(request).await;
    state
        .observability
        .end_span(&span, response.status().as_u16(), None);

    response
}
