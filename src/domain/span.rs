use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde_json::Map;

use super::LogEntry;

/// Open interval between a request's start and its completion.
///
/// Transient, never persisted. Completion is at-most-once: hosts may deliver
/// more than one terminal lifecycle signal for the same request (a "finished"
/// and a "connection closed"), and only the first one produces an entry.
#[derive(Debug)]
pub struct Span {
    method: String,
    endpoint: String,
    started_at: Instant,
    completed: AtomicBool,
}

impl Span {
    /// Capture the current instant for the given request. No side effects.
    pub fn start(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            started_at: Instant::now(),
            completed: AtomicBool::new(false),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Complete the span, returning the entry to persist.
    ///
    /// Returns `None` on every call after the first; duplicate terminal
    /// signals must not double-count the request.
    pub fn complete(&self, status_code: u16, error_message: Option<String>) -> Option<LogEntry> {
        if self.completed.swap(true, Ordering::SeqCst) {
            return None;
        }

        // Monotonic elapsed time, so clock adjustments can never produce a
        // negative latency.
        let latency_ms = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        Some(LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            method: self.method.clone(),
            endpoint: self.endpoint.clone(),
            status_code,
            latency_ms,
            error_message,
            extra: Map::new(),
        })
    }
}
