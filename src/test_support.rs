//! Shared test support utilities
//!
//! Provides a `MockSink` implementing [`LogSink`] so capture paths can be
//! exercised without touching the filesystem.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::ObservabilityError;
use crate::port::LogSink;

/// Mock sink that captures appended records for assertions.
pub struct MockSink {
    records: Arc<Mutex<Vec<Value>>>,
    should_fail: AtomicBool,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MockSink {
    fn append(
        &self,
        record: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), ObservabilityError>> + Send + '_>> {
        let records = self.records.clone();
        Box::pin(async move {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(ObservabilityError::Storage {
                    path: "mock".into(),
                    source: std::io::Error::other("mock append failure"),
                });
            }
            records.lock().unwrap().push(record);
            Ok(())
        })
    }
}
