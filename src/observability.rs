use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::error;

use crate::config::Settings;
use crate::domain::{LogEntry, SnapshotDocument, SnapshotMetadata, Span, Stats, compute_stats};
use crate::error::ObservabilityError;
use crate::port::LogSink;
use crate::snapshot::SnapshotStore;
use crate::store::{LogReader, LogWriter};

/// Default page size for the slow-request query.
pub const DEFAULT_SLOW_PER_PAGE: usize = 20;

/// Cap on slow entries embedded in a snapshot.
const SNAPSHOT_SLOW_LIMIT: usize = 100;

/// Capture and query facade composing the log store, reader and snapshot
/// store. Holds all directory/prefix/rotation state explicitly; nothing is
/// ambient.
pub struct Observability {
    sink: Arc<dyn LogSink>,
    reader: LogReader,
    snapshots: SnapshotStore,
    settings: Settings,
}

impl Observability {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let sink: Arc<dyn LogSink> = Arc::new(LogWriter::new(
            &settings.log_file_prefix,
            settings.max_entries_per_file,
        ));
        Self::with_sink(settings, sink)
    }

    /// Compose with a custom sink (alternative backends, tests).
    #[must_use]
    pub fn with_sink(settings: &Settings, sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            reader: LogReader::new(&settings.log_file_prefix),
            snapshots: SnapshotStore::new(&settings.snapshot_dir),
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Literal prefix match against the raw request path.
    pub fn should_ignore(&self, path: &str) -> bool {
        self.settings
            .ignore_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Open a span for an in-flight request. Pure; no side effects.
    pub fn start_span(&self, method: impl Into<String>, endpoint: impl Into<String>) -> Span {
        Span::start(method, endpoint)
    }

    /// Complete the span and persist the resulting entry, fire-and-forget.
    ///
    /// Duplicate completions of the same span are dropped, so two terminal
    /// host signals produce exactly one persisted entry.
    pub fn end_span(&self, span: &Span, status_code: u16, error_message: Option<String>) {
        if let Some(entry) = span.complete(status_code, error_message) {
            self.dispatch_entry(entry);
        }
    }

    /// One-shot capture hook for hosts that measure latency themselves.
    pub fn record(
        &self,
        method: impl Into<String>,
        endpoint: impl Into<String>,
        status_code: u16,
        latency_ms: u64,
        error_message: Option<String>,
    ) {
        self.dispatch_entry(LogEntry {
            timestamp: now_rfc3339(),
            method: method.into(),
            endpoint: endpoint.into(),
            status_code,
            latency_ms,
            error_message,
            extra: Map::new(),
        });
    }

    /// Append a free-form record through the same store. A timestamp is
    /// added unless the caller supplies one.
    pub fn log(&self, fields: Map<String, Value>) {
        let mut record = Map::new();
        record.insert("timestamp".to_string(), Value::String(now_rfc3339()));
        record.extend(fields);
        self.dispatch(Value::Object(record));
    }

    /// Durable variant of the capture path: resolves once the entry is
    /// appended. For callers that need write-then-read consistency.
    pub async fn append_entry(&self, entry: LogEntry) -> Result<(), ObservabilityError> {
        let value = serde_json::to_value(&entry)?;
        self.sink.append(value).await
    }

    fn dispatch_entry(&self, entry: LogEntry) {
        match serde_json::to_value(&entry) {
            Ok(value) => self.dispatch(value),
            Err(e) => error!("Failed to serialize log entry: {e}"),
        }
    }

    /// The request path never waits on disk: the append runs on a spawned
    /// task and a failure is logged and dropped.
    fn dispatch(&self, record: Value) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.append(record).await {
                error!("Failed to write log entry: {e}");
            }
        });
    }

    pub async fn stats(&self) -> Stats {
        compute_stats(&self.reader.read_all().await)
    }

    /// Entries strictly slower than `threshold_ms`, newest first, windowed
    /// with the same page semantics as the log query.
    pub async fn slow_requests(
        &self,
        threshold_ms: u64,
        page: usize,
        per_page: usize,
    ) -> Vec<LogEntry> {
        let page = page.max(1);
        let per_page = if per_page == 0 {
            DEFAULT_SLOW_PER_PAGE
        } else {
            per_page
        };
        self.reader
            .read_all()
            .await
            .into_iter()
            .filter(|entry| entry.latency_ms > threshold_ms)
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }

    pub async fn read_logs(&self) -> Vec<LogEntry> {
        self.reader.read_all().await
    }

    pub async fn read_logs_paginated(&self, page: usize, per_page: usize) -> Vec<LogEntry> {
        self.reader.read_paginated(page, per_page).await
    }

    /// Compose stats + slow list + a capped newest-first log excerpt into a
    /// new snapshot artifact.
    pub async fn create_snapshot(
        &self,
        name: Option<String>,
    ) -> Result<SnapshotMetadata, ObservabilityError> {
        let logs = self.reader.read_all().await;
        let stats = compute_stats(&logs);
        let threshold = self.settings.slow_threshold_ms;
        let slow_endpoints: Vec<LogEntry> = logs
            .iter()
            .filter(|entry| entry.latency_ms > threshold)
            .take(SNAPSHOT_SLOW_LIMIT)
            .cloned()
            .collect();
        let logs: Vec<LogEntry> = logs
            .into_iter()
            .take(self.settings.export_log_limit)
            .collect();

        self.snapshots
            .create(name, stats, slow_endpoints, logs, threshold)
            .await
    }

    pub async fn list_snapshots(&self) -> Vec<SnapshotMetadata> {
        self.snapshots.list().await
    }

    pub async fn get_snapshot(&self, id_or_name: &str) -> Option<SnapshotDocument> {
        self.snapshots.get(id_or_name).await
    }

    pub async fn delete_snapshot(&self, id_or_name: &str) -> bool {
        self.snapshots.delete(id_or_name).await
    }

    pub async fn export_snapshot(&self, id_or_name: &str) -> Option<(Vec<u8>, String)> {
        self.snapshots.export(id_or_name).await
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSink;

    fn test_settings() -> Settings {
        Settings {
            ignore_paths: vec!["/observability".to_string()],
            ..Settings::default()
        }
    }

    async fn settle(sink: &MockSink, expected: usize) {
        for _ in 0..100 {
            if sink.records().len() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn end_span_persists_exactly_once() {
        let sink = Arc::new(MockSink::new());
        let obs = Observability::with_sink(&test_settings(), sink.clone());

        let span = obs.start_span("GET", "/users");
        obs.end_span(&span, 200, None);
        obs.end_span(&span, 200, None);

        settle(&sink, 1).await;
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0]["endpoint"], "/users");
    }

    #[tokio::test]
    async fn record_builds_full_entry() {
        let sink = Arc::new(MockSink::new());
        let obs = Observability::with_sink(&test_settings(), sink.clone());

        obs.record("POST", "/orders", 500, 1234, Some("boom".to_string()));

        settle(&sink, 1).await;
        let records = sink.records();
        assert_eq!(records[0]["statusCode"], 500);
        assert_eq!(records[0]["latencyMs"], 1234);
        assert_eq!(records[0]["errorMessage"], "boom");
    }

    #[tokio::test]
    async fn log_stamps_timestamp_and_keeps_fields() {
        let sink = Arc::new(MockSink::new());
        let obs = Observability::with_sink(&test_settings(), sink.clone());

        let mut fields = Map::new();
        fields.insert("service".to_string(), "worker".into());
        obs.log(fields);

        settle(&sink, 1).await;
        let records = sink.records();
        assert_eq!(records[0]["service"], "worker");
        assert!(records[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn write_failures_are_swallowed() {
        let sink = Arc::new(MockSink::new());
        sink.set_should_fail(true);
        let obs = Observability::with_sink(&test_settings(), sink.clone());

        let span = obs.start_span("GET", "/users");
        obs.end_span(&span, 200, None);
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        // Nothing recorded, nothing panicked.
        assert!(sink.records().is_empty());
    }

    #[test]
    fn ignore_paths_use_prefix_match() {
        let sink = Arc::new(MockSink::new());
        let obs = Observability::with_sink(&test_settings(), sink);
        assert!(obs.should_ignore("/observability/stats"));
        assert!(obs.should_ignore("/observability"));
        assert!(!obs.should_ignore("/orders"));
    }
}
