//! Connection acceptance.
//!
//! The [`Server`] binds the preferred port and accepts on it. If that bind
//! fails, or an accept does, it falls back to [`recovery::PortRecovery`],
//! which keeps serving on whichever recovery port it manages to bind. The
//! only way out is running out of ports.

pub mod listener;
pub mod recovery;
pub mod session;
pub mod status;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::warn;

use crate::config::Config;
use crate::error::ServerError;
use crate::http::site::Site;
use crate::tls::SecureTransport;

use listener::{Accept, Acceptor};
use recovery::PortRecovery;
use status::ServerStatus;

pub struct Server<T> {
    config: Config,
    acceptor: Acceptor<T>,
    status: ServerStatus,
}

impl<T: SecureTransport> Server<T> {
    pub fn new(config: Config, transport: T) -> Self {
        let status = ServerStatus::new();
        let site = Arc::new(Site::from_config(&config));
        let acceptor = Acceptor::new(transport, site, status.clone());

        Self {
            config,
            acceptor,
            status,
        }
    }

    /// Handle for reading the server status while it runs.
    pub fn status(&self) -> ServerStatus {
        self.status.clone()
    }

    /// Runs until no port can be bound. Never returns `Ok`.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with(|listener| listener).await
    }

    /// Like [`run`](Self::run), with `layer` applied to every listener the
    /// server binds, the preferred one and each recovered one.
    pub async fn run_with<L, F>(mut self, mut layer: F) -> Result<(), ServerError>
    where
        L: Accept,
        F: FnMut(TcpListener) -> L + Send,
    {
        match listener::bind(&self.config.host, self.config.port).await {
            Ok(listener) => {
                let e = self.acceptor.serve(layer(listener)).await;
                warn!(port = self.config.port, error = %e, "accept failed, attempting to self-correct");
            }
            Err(e) => {
                warn!(error = %e, "the port specified was closed, attempting to self-correct");
            }
        }

        let mut recovery = PortRecovery::new(self.config.host.clone(), self.config.recovery);
        Err(recovery.run_with(&mut self.acceptor, layer).await)
    }
}
