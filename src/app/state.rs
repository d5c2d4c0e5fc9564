use std::sync::Arc;

use crate::config::Settings;
use crate::observability::Observability;

/// Shared application state holding the capture facade.
#[derive(Clone)]
pub struct AppState {
    pub observability: Arc<Observability>,
}

impl AppState {
    /// Create `AppState` from configuration settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            observability: Arc::new(Observability::from_settings(settings)),
        }
    }
}

impl From<Arc<Observability>> for AppState {
    fn from(observability: Arc<Observability>) -> Self {
        Self { observability }
    }
}
