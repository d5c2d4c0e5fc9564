pub mod reader;
pub mod writer;

pub use reader::LogReader;
pub use writer::LogWriter;

use std::path::{Path, PathBuf};

/// Split a configured prefix like `logs/observability` into the directory
/// holding the rotated files and the file base name.
pub(crate) fn split_prefix(prefix: &str) -> (PathBuf, String) {
    let path = Path::new(prefix);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let base_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "observability".to_string());
    (directory, base_name)
}

/// Path of the rotated log file with the given index.
pub(crate) fn log_file_path(directory: &Path, base_name: &str, index: u32) -> PathBuf {
    directory.join(format!("{base_name}_{index}.log"))
}

/// Highest contiguous file index starting at 1, or 0 when no files exist.
///
/// Indices are dense by construction, so probing upward from 1 is enough and
/// keeps readers independent of the writer's private state.
pub(crate) async fn max_file_index(directory: &Path, base_name: &str) -> u32 {
    let mut index = 0;
    loop {
        let candidate = log_file_path(directory, base_name, index + 1);
        match tokio::fs::try_exists(&candidate).await {
            Ok(true) => index += 1,
            _ => break,
        }
    }
    index
}
