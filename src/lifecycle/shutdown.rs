//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Coordinator for graceful shutdown.
///
/// The serve loop (and anything else long-running) subscribes; a single
/// `trigger` reaches every subscriber. Dropping the coordinator also wakes
/// subscribers, so keep it alive for as long as the server should run.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers = notified, "Shutdown triggered");
    }

    /// Wait for SIGINT/SIGTERM, then trigger.
    pub async fn trigger_on_signal(self) {
        signals::wait_for_signal().await;
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_is_notified() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        Shutdown::new().trigger();
    }
}
