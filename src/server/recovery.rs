use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::RecoveryConfig;
use crate::error::{Result, ServerError};
use crate::server::listener::{self, Accept, Acceptor};
use crate::tls::SecureTransport;

/// Linear probe over `base_port + 1 ..= base_port + max_attempts`.
///
/// The counter only ever grows: a port given up on is never tried again
/// during the lifetime of this value.
#[derive(Debug, Clone)]
pub struct PortRecovery {
    host: String,
    base_port: u16,
    max_attempts: u16,
    counter: u32,
}

impl PortRecovery {
    pub fn new(host: impl Into<String>, cfg: RecoveryConfig) -> Self {
        Self {
            host: host.into(),
            base_port: cfg.base_port,
            max_attempts: cfg.max_attempts,
            counter: 1,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// The port the next probe will try, or `None` once the range is used
    /// up. A range running past 65535 ends at 65535.
    pub fn candidate_port(&self) -> Option<u16> {
        if self.counter > u32::from(self.max_attempts) {
            return None;
        }
        u16::try_from(u32::from(self.base_port) + self.counter).ok()
    }

    /// Gives up on the current candidate. It is never tried again.
    pub fn skip(&mut self) {
        self.counter = self.counter.saturating_add(1);
    }

    /// Binds the first free candidate, starting at the current counter.
    pub async fn next_listener(&mut self) -> Result<TcpListener> {
        loop {
            let Some(port) = self.candidate_port() else {
                return Err(ServerError::PortsExhausted {
                    counter: self.counter,
                    first: self.base_port.saturating_add(1),
                    last: self.base_port.saturating_add(self.max_attempts),
                });
            };

            info!(port, "Attempting to bind port");
            match listener::bind(&self.host, port).await {
                Ok(listener) => return Ok(listener),
                Err(e) => {
                    debug!(error = %e, "port unavailable");
                    self.skip();
                }
            }
        }
    }

    /// Serves on recovered ports until the range is used up. Each accept
    /// failure moves the search past the port that failed. `layer` wraps
    /// every bound listener before the acceptor sees it.
    pub async fn run_with<T, L, F>(&mut self, acceptor: &mut Acceptor<T>, mut layer: F) -> ServerError
    where
        T: SecureTransport,
        L: Accept,
        F: FnMut(TcpListener) -> L + Send,
    {
        loop {
            let listener = match self.next_listener().await {
                Ok(listener) => listener,
                Err(e) => return e,
            };

            let port = self.candidate_port();
            let e = acceptor.serve(layer(listener)).await;
            warn!(port = ?port, error = %e, "accept failed, searching for another port");
            self.skip();
        }
    }
}
