use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

/// What the operator sees when asking for status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Port the server is currently accepting on.
    pub listening_port: Option<u16>,
    /// Address of the most recently accepted client.
    pub last_peer: Option<SocketAddr>,
}

impl StatusSnapshot {
    pub fn report(&self) -> String {
        let mut out = String::new();
        match self.last_peer {
            None => out.push_str("The server has not received any connections.\n"),
            Some(peer) => {
                out.push_str(&format!("The connected host is: {}\n", peer.ip()));
                out.push_str(&format!("The connected port is: {}\n", peer.port()));
            }
        }
        if let Some(port) = self.listening_port {
            out.push_str(&format!("Listening on port: {}\n", port));
        }
        out
    }
}

/// Shared, lock-guarded server status. Cloning yields another handle to the
/// same state. Host and port are updated together, so readers never see a
/// mix of two connections.
#[derive(Debug, Clone, Default)]
pub struct ServerStatus {
    inner: Arc<RwLock<StatusSnapshot>>,
}

impl ServerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_listening(&self, port: u16) {
        self.inner.write().await.listening_port = Some(port);
    }

    pub async fn record_peer(&self, peer: SocketAddr) {
        self.inner.write().await.last_peer = Some(peer);
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        *self.inner.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_status_reports_no_connections() {
        let status = ServerStatus::new();
        let report = status.snapshot().await.report();

        assert!(report.contains("has not received any connections"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let status = ServerStatus::new();
        let writer = status.clone();

        writer.record_listening(4003).await;
        writer.record_peer("10.0.0.7:51234".parse().unwrap()).await;

        let snap = status.snapshot().await;
        assert_eq!(snap.listening_port, Some(4003));

        let report = snap.report();
        assert!(report.contains("The connected host is: 10.0.0.7"));
        assert!(report.contains("The connected port is: 51234"));
        assert!(report.contains("Listening on port: 4003"));
    }
}
