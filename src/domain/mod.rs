pub mod log_entry;
pub mod snapshot;
pub mod span;
pub mod stats;

pub use log_entry::LogEntry;
pub use snapshot::{SnapshotDocument, SnapshotInfo, SnapshotMetadata};
pub use span::Span;
pub use stats::{Stats, compute_stats};
