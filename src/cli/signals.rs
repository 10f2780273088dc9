//! Ctrl+C handling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown flag set on Ctrl+C
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Start listening for Ctrl+C in the background
    pub fn setup(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::debug!("interrupt received");
                    shutdown.store(true, Ordering::SeqCst);
                }
                Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl+C"),
            }
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_signal_default_is_false() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn shutdown_signal_flag_can_be_set() {
        let signal = ShutdownSignal::new();
        let flag = signal.flag();
        flag.store(true, Ordering::SeqCst);
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn setup_does_not_trigger() {
        let signal = ShutdownSignal::new();
        signal.setup();
        tokio::task::yield_now().await;
        assert!(!signal.is_shutdown());
    }
}
