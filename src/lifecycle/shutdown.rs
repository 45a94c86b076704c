//! Shutdown coordination for the facade.

use std::sync::Arc;

use tokio::sync::watch;

/// Handle that requests a graceful shutdown. Cheap to clone.
///
/// The request is sticky: a [`ShutdownSignal`] taken after [`Shutdown::trigger`]
/// resolves immediately. Dropping every handle also counts as a shutdown.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A signal the server (or any long-running task) can await.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!("Shutdown requested");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`Shutdown`].
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once shutdown was requested or every [`Shutdown`] handle is gone.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|requested| *requested).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let first = shutdown.subscribe();
        let second = shutdown.clone().subscribe();

        shutdown.trigger();
        timeout(Duration::from_secs(1), first.wait()).await.unwrap();
        timeout(Duration::from_secs(1), second.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();

        timeout(Duration::from_secs(1), shutdown.subscribe().wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropping_every_handle_releases_waiters() {
        let shutdown = Shutdown::new();
        let signal = shutdown.clone().subscribe();
        drop(shutdown);

        timeout(Duration::from_secs(1), signal.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_signal_pends_until_triggered() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();

        assert!(timeout(Duration::from_millis(50), signal.wait()).await.is_err());
    }
}
