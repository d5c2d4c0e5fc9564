// Rotating ND-JSON log store. Each append writes a single self-describing
// JSON line to the current `{prefix}_{index}.log` file; once the file holds
// `max_entries_per_file` entries, the next append rotates to `index + 1`.
//
// The writer state (open file, index, entry count) lives behind an async
// mutex, making the rotate-check + append sequence one exclusive critical
// section.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde_json::Value;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::ObservabilityError;
use crate::port::LogSink;

/// Writer state guarded by the mutex: the open file plus rotation counters.
struct Inner {
    file: File,
    index: u32,
    entry_count: usize,
}

pub struct LogWriter {
    directory: PathBuf,
    base_name: String,
    max_entries_per_file: usize,
    inner: Mutex<Option<Inner>>,
}

impl LogWriter {
    /// Create a writer for the given prefix. No file is touched until the
    /// first append.
    pub fn new(prefix: &str, max_entries_per_file: usize) -> Self {
        let (directory, base_name) = super::split_prefix(prefix);
        Self {
            directory,
            base_name,
            max_entries_per_file,
            inner: Mutex::new(None),
        }
    }

    /// Append one record as a single ND-JSON line, rotating first if the
    /// current file is full.
    pub async fn append(&self, record: &Value) -> Result<(), ObservabilityError> {
        let line = serde_json::to_string(record)?;

        let mut guard = self.inner.lock().await;
        let inner = match &mut *guard {
            Some(inner) => inner,
            state @ None => {
                let recovered = self.recover().await?;
                state.insert(recovered)
            }
        };

        if inner.entry_count >= self.max_entries_per_file {
            inner.index += 1;
            inner.entry_count = 0;
            inner.file = self.open_log_file(inner.index).await?;
        }

        let path = super::log_file_path(&self.directory, &self.base_name, inner.index);
        write_line(&mut inner.file, &line, &path).await?;
        inner.entry_count += 1;

        Ok(())
    }

    /// Resume at the highest contiguous existing index, re-counting its
    /// lines so rotation continues correctly across restarts.
    async fn recover(&self) -> Result<Inner, ObservabilityError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| ObservabilityError::Storage {
                path: self.directory.clone(),
                source,
            })?;

        let index = super::max_file_index(&self.directory, &self.base_name)
            .await
            .max(1);
        let path = super::log_file_path(&self.directory, &self.base_name, index);
        let entry_count = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content.lines().filter(|l| !l.trim().is_empty()).count(),
            Err(_) => 0,
        };
        let file = self.open_log_file(index).await?;

        Ok(Inner {
            file,
            index,
            entry_count,
        })
    }

    async fn open_log_file(&self, index: u32) -> Result<File, ObservabilityError> {
        let path = super::log_file_path(&self.directory, &self.base_name, index);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| ObservabilityError::Storage { path, source })
    }
}

async fn write_line(
    file: &mut File,
    line: &str,
    path: &std::path::Path,
) -> Result<(), ObservabilityError> {
    let storage = |source| ObservabilityError::Storage {
        path: path.to_path_buf(),
        source,
    };
    file.write_all(line.as_bytes()).await.map_err(storage)?;
    file.write_all(b"\n").await.map_err(storage)?;
    file.flush().await.map_err(storage)?;
    Ok(())
}

impl LogSink for LogWriter {
    fn append(
        &self,
        record: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), ObservabilityError>> + Send + '_>> {
        Box::pin(async move { LogWriter::append(self, &record).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(n: usize) -> Value {
        json!({
            "timestamp": "2025-01-10T12:00:00.000Z",
            "method": "GET",
            "endpoint": format!("/e{n}"),
            "statusCode": 200,
            "latencyMs": 5,
        })
    }

    #[tokio::test]
    async fn first_append_creates_file_one() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("observability");
        let writer = LogWriter::new(prefix.to_str().unwrap(), 100);

        writer.append(&record(1)).await.unwrap();

        let content =
            std::fs::read_to_string(temp.path().join("observability_1.log")).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn stays_in_one_file_up_to_cap() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("observability");
        let writer = LogWriter::new(prefix.to_str().unwrap(), 3);

        for n in 0..3 {
            writer.append(&record(n)).await.unwrap();
        }

        let files: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn rotates_when_full() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("observability");
        let writer = LogWriter::new(prefix.to_str().unwrap(), 2);

        for n in 0..5 {
            writer.append(&record(n)).await.unwrap();
        }

        let first =
            std::fs::read_to_string(temp.path().join("observability_1.log")).unwrap();
        let second =
            std::fs::read_to_string(temp.path().join("observability_2.log")).unwrap();
        let third =
            std::fs::read_to_string(temp.path().join("observability_3.log")).unwrap();
        assert_eq!(first.lines().count(), 2);
        assert_eq!(second.lines().count(), 2);
        assert_eq!(third.lines().count(), 1);
    }

    #[tokio::test]
    async fn resumes_rotation_state_across_writers() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("observability");

        let writer = LogWriter::new(prefix.to_str().unwrap(), 2);
        for n in 0..3 {
            writer.append(&record(n)).await.unwrap();
        }
        drop(writer);

        // A fresh writer picks up at file 2 (one entry) instead of
        // restarting at file 1.
        let writer = LogWriter::new(prefix.to_str().unwrap(), 2);
        writer.append(&record(3)).await.unwrap();
        writer.append(&record(4)).await.unwrap();

        let second =
            std::fs::read_to_string(temp.path().join("observability_2.log")).unwrap();
        let third =
            std::fs::read_to_string(temp.path().join("observability_3.log")).unwrap();
        assert_eq!(second.lines().count(), 2);
        assert_eq!(third.lines().count(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_never_exceed_cap() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("observability");
        let writer = std::sync::Arc::new(LogWriter::new(prefix.to_str().unwrap(), 2));

        let mut handles = Vec::new();
        for n in 0..10 {
            let writer = writer.clone();
            handles.push(tokio::spawn(async move {
                writer.append(&record(n)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut total = 0;
        for index in 1..=5u32 {
            let path = temp.path().join(format!("observability_{index}.log"));
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.lines().count() <= 2, "file {index} over cap");
            total += content.lines().count();
        }
        assert_eq!(total, 10);
    }
}
