use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::error;

/// Shared flag tracking whether the database is reachable.
///
/// The ingestion path keeps accepting and broadcasting readings when the
/// database drops out; it flips this flag so later requests skip the write
/// instead of timing out on every call.
#[derive(Debug, Clone)]
pub struct DbStatus {
    online: Arc<AtomicBool>,
}

impl DbStatus {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn mark_offline(&self) {
        if self.online.swap(false, Ordering::Relaxed) {
            error!("Database connection lost, marking database offline");
        }
    }
}

impl Default for DbStatus {
    fn default() -> Self {
        Self::new(true)
    }
}
