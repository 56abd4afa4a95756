use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::services::ProgressService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    progress: Arc<ProgressService>,
}

impl AppState {
    pub fn new(progress: ProgressService) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            progress: Arc::new(progress),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
