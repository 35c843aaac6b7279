//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fans a single shutdown trigger out to every running server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to [`crate::http::HttpServer::run`].
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners, "Shutdown triggered");
        listeners
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
