use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{LogEntry, Stats};

/// Metadata block embedded in a snapshot artifact.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub snapshot_id: String,
    pub name: String,
    pub created_at: String,
    pub exported_at: String,
    pub log_count: usize,
    pub slow_request_count: usize,
    pub slow_threshold_ms: u64,
}

/// Full self-contained snapshot artifact as serialized on disk.
///
/// Independent of the rotating log files: deleting those must not
/// invalidate a previously created snapshot.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub metadata: SnapshotInfo,
    pub stats: Stats,
    pub slow_endpoints: Vec<LogEntry>,
    pub logs: Vec<LogEntry>,
}

/// Summary returned by create/list operations.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: String,
    pub stats: Stats,
}
