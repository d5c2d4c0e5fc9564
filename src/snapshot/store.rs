// Snapshot artifacts: self-contained JSON exports of stats + slow list +
// a capped log excerpt, stored one file per snapshot in a dedicated
// directory. Artifacts survive deletion of the rotating log files.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use tokio::fs;
use tracing::error;

use crate::domain::{LogEntry, SnapshotDocument, SnapshotInfo, SnapshotMetadata, Stats};
use crate::error::ObservabilityError;

pub struct SnapshotStore {
    directory: PathBuf,
}

impl SnapshotStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Persist a new artifact and return its metadata.
    ///
    /// The artifact filename derives from the snapshot name, so re-using a
    /// name overwrites the previous artifact; ids stay unique.
    pub async fn create(
        &self,
        name: Option<String>,
        stats: Stats,
        slow_endpoints: Vec<LogEntry>,
        logs: Vec<LogEntry>,
        slow_threshold_ms: u64,
    ) -> Result<SnapshotMetadata, ObservabilityError> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| ObservabilityError::Storage {
                path: self.directory.clone(),
                source,
            })?;

        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let id = generate_snapshot_id();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_name(&created_at));

        let document = SnapshotDocument {
            metadata: SnapshotInfo {
                snapshot_id: id.clone(),
                name: name.clone(),
                created_at: created_at.clone(),
                exported_at: created_at.clone(),
                log_count: logs.len(),
                slow_request_count: slow_endpoints.len(),
                slow_threshold_ms,
            },
            stats: stats.clone(),
            slow_endpoints,
            logs,
        };

        let path = self.directory.join(artifact_file_name(&name));
        let body = serde_json::to_vec_pretty(&document)?;
        fs::write(&path, body)
            .await
            .map_err(|source| ObservabilityError::Storage {
                path: path.clone(),
                source,
            })?;

        Ok(SnapshotMetadata {
            id,
            name,
            path,
            created_at,
            stats,
        })
    }

    /// All snapshot metadata, newest created first.
    ///
    /// Unreadable or corrupt artifacts are skipped; a missing directory
    /// yields an empty list.
    pub async fn list(&self) -> Vec<SnapshotMetadata> {
        let mut dir = match fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(_) => return Vec::new(),
        };

        let mut snapshots = Vec::new();
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                _ => break,
            };
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(document) = self.read_document(&path).await {
                snapshots.push(SnapshotMetadata {
                    id: document.metadata.snapshot_id,
                    name: document.metadata.name,
                    path,
                    created_at: document.metadata.created_at,
                    stats: document.stats,
                });
            }
        }

        // RFC 3339 strings order lexicographically by instant.
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshots
    }

    /// Resolve by id first, then by name; the artifact is loaded from disk
    /// on demand.
    pub async fn get(&self, id_or_name: &str) -> Option<SnapshotDocument> {
        let path = self.resolve(id_or_name).await?;
        self.read_document(&path).await
    }

    /// Delete the backing artifact. Returns whether a match existed.
    pub async fn delete(&self, id_or_name: &str) -> bool {
        let Some(path) = self.resolve(id_or_name).await else {
            return false;
        };
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to delete snapshot {}: {e}", path.display());
                false
            }
        }
    }

    /// Full artifact bytes plus the download filename
    /// (`snapshot_{id-or-name}.json`).
    pub async fn export(&self, id_or_name: &str) -> Option<(Vec<u8>, String)> {
        let document = self.get(id_or_name).await?;
        let tag = if document.metadata.snapshot_id.is_empty() {
            document.metadata.name.clone()
        } else {
            document.metadata.snapshot_id.clone()
        };
        let body = serde_json::to_vec_pretty(&document).ok()?;
        Some((body, format!("snapshot_{tag}.json")))
    }

    async fn resolve(&self, id_or_name: &str) -> Option<PathBuf> {
        let snapshots = self.list().await;
        snapshots
            .iter()
            .find(|s| s.id == id_or_name)
            .or_else(|| snapshots.iter().find(|s| s.name == id_or_name))
            .map(|s| s.path.clone())
    }

    async fn read_document(&self, path: &Path) -> Option<SnapshotDocument> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read snapshot {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(document) => Some(document),
            Err(e) => {
                error!("Failed to parse snapshot {}: {e}", path.display());
                None
            }
        }
    }
}

/// Time-based id with a random base36 suffix to avoid collisions.
fn generate_snapshot_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = to_base36(rand::thread_rng().gen_range(0..10_000));
    format!("snap_{millis}_{suffix}")
}

/// Default name when the caller supplies none.
fn default_name(created_at: &str) -> String {
    format!("snapshot_{}", created_at.replace([':', '.'], "-"))
}

/// Artifact filename from the snapshot name, with path-hostile characters
/// replaced so a user-supplied name cannot escape the snapshots directory.
fn artifact_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{safe}.json")
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = String::new();
    loop {
        out.insert(0, DIGITS[(n % 36) as usize] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_ids_have_expected_shape() {
        let id = generate_snapshot_id();
        assert!(id.starts_with("snap_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn default_name_is_filesystem_friendly() {
        let name = default_name("2025-01-10T12:00:00.000Z");
        assert_eq!(name, "snapshot_2025-01-10T12-00-00-000Z");
    }

    #[test]
    fn artifact_file_name_neutralizes_separators() {
        assert_eq!(artifact_file_name("daily"), "daily.json");
        assert_eq!(artifact_file_name("../escape"), "---escape.json");
        assert_eq!(artifact_file_name("a/b"), "a-b.json");
    }

    #[test]
    fn base36_round_numbers() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
