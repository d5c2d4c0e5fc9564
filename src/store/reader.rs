use std::path::PathBuf;

use tracing::error;

use crate::domain::LogEntry;

/// Default page size when a caller passes no (or a non-positive) `perPage`.
pub const DEFAULT_PER_PAGE: usize = 50;

/// Reconstructs logically-ordered views over the rotated files.
///
/// Files are read lazily per query, highest index first; within each file
/// line order is reversed, so results are globally newest-first. There is no
/// cache: every call is O(entries read).
pub struct LogReader {
    directory: PathBuf,
    base_name: String,
}

impl LogReader {
    pub fn new(prefix: &str) -> Self {
        let (directory, base_name) = super::split_prefix(prefix);
        Self {
            directory,
            base_name,
        }
    }

    /// All entries across every rotated file, newest first.
    pub async fn read_all(&self) -> Vec<LogEntry> {
        let mut logs = Vec::new();
        let top = super::max_file_index(&self.directory, &self.base_name).await;
        for index in (1..=top).rev() {
            if let Some(mut entries) = self.read_file(index).await {
                logs.append(&mut entries);
            }
        }
        logs
    }

    /// One page of entries, newest first.
    ///
    /// Stops opening further files once the requested window is filled.
    /// `page` is 1-indexed; zero falls back to 1, a zero `per_page` to
    /// [`DEFAULT_PER_PAGE`].
    pub async fn read_paginated(&self, page: usize, per_page: usize) -> Vec<LogEntry> {
        let page = page.max(1);
        let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        let start = (page - 1) * per_page;
        let end = start + per_page;

        let mut logs = Vec::new();
        let mut seen = 0usize;
        let top = super::max_file_index(&self.directory, &self.base_name).await;
        for index in (1..=top).rev() {
            if seen >= end {
                break;
            }
            let Some(entries) = self.read_file(index).await else {
                continue;
            };
            for entry in entries {
                if seen >= end {
                    return logs;
                }
                if seen >= start {
                    logs.push(entry);
                }
                seen += 1;
            }
        }
        logs
    }

    /// Parse one rotated file, newest line first.
    ///
    /// An unreadable file is skipped (remaining files still contribute);
    /// malformed lines are dropped silently.
    async fn read_file(&self, index: u32) -> Option<Vec<LogEntry>> {
        let path = super::log_file_path(&self.directory, &self.base_name, index);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    error!("Failed to read log file {}: {e}", path.display());
                }
                return None;
            }
        };
        if content.is_empty() {
            return None;
        }

        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        entries.reverse();
        Some(entries)
    }
}
