use crate::ShutdownGuard;

use tokio::sync::broadcast;

/// Broadcasts a single shutdown signal to every live connection task
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { shutdown_tx }
    }

    /// Get a receiver for shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown (called from the signal handler)
    pub fn shutdown(&self) {
        log::info!("Shutdown signal received, closing subscriber connections");
        let _ = self.shutdown_tx.send(());
    }

    /// Convenience method to create a guard for one connection task
    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
