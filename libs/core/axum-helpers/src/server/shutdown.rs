use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;

/// Shutdown coordinator that manages graceful application shutdown.
///
/// This handles:
/// - Signal reception (SIGTERM, SIGINT)
/// - Broadcasting shutdown to all subsystems
/// - Shutdown state tracking
#[derive(Clone)]
pub struct ShutdownCoordinator {
    /// Broadcast channel to notify all tasks of shutdown
    tx: broadcast::Sender<()>,
    /// Flag indicating if shutdown has been initiated
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator.
    ///
    /// Returns the coordinator and a receiver for shutdown signals.
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (tx, rx) = broadcast::channel(1);
        let coordinator = Self {
            tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        };
        (coordinator, rx)
    }

    /// Subscribe to shutdown notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Check if shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    /// Initiate shutdown and notify all subscribers.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            let _ = self.tx.send(());
        }
    }

    /// Wait until either an OS signal arrives or another task has already
    /// initiated shutdown, then make sure shutdown is broadcast.
    pub async fn wait_for_signal(&self) {
        let mut rx = self.subscribe();

        tokio::select! {
            _ = shutdown_signal() => {},
            _ = rx.recv() => {},
        }

        self.shutdown();
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

/// Shutdown future for `axum::serve::with_graceful_shutdown` that also
/// notifies the coordinator's subscribers (e.g. the cleanup task).
pub async fn coordinated_shutdown(coordinator: ShutdownCoordinator) {
    coordinator.wait_for_signal().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_notifies_subscribers() {
        let (coordinator, mut rx) = ShutdownCoordinator::new();
        assert!(!coordinator.is_shutting_down());

        coordinator.shutdown();

        assert!(coordinator.is_shutting_down());
        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        coordinator.shutdown();
        coordinator.shutdown();
        assert!(coordinator.is_shutting_down());
    }
}
