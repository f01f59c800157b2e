/// Shared application state for the webserver
use crate::config::Config;
use crate::notes::NoteRepository;
use crate::signals::SignalAnalyzer;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<Config>,

    pub analyzer: Arc<SignalAnalyzer>,

    pub notes: Arc<dyn NoteRepository>,

    /// Server startup time
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        analyzer: Arc<SignalAnalyzer>,
        notes: Arc<dyn NoteRepository>,
    ) -> Self {
        Self {
            config,
            analyzer,
            notes,
            startup_time: Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}
