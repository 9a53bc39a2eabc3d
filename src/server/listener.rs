use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::error::{Result, ServerError};
use crate::http::site::Site;
use crate::server::session;
use crate::server::status::ServerStatus;
use crate::tls::SecureTransport;

pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// A source of accepted sockets. [`TcpListener`] is the one used in
/// production; wrappers can sit in front of it to shape what the acceptor
/// sees.
pub trait Accept: Send + Sync {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Accept for TcpListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

enum Event {
    Accepted(io::Result<(TcpStream, SocketAddr)>),
    Finished(std::result::Result<(), JoinError>),
}

/// Accepts connections and runs one session task per connection.
///
/// Sessions are kept in a `JoinSet` that outlives any single listener, so a
/// listener failing does not cut off sessions already in flight.
pub struct Acceptor<T> {
    transport: T,
    site: Arc<Site>,
    status: ServerStatus,
    sessions: JoinSet<()>,
}

impl<T: SecureTransport> Acceptor<T> {
    pub fn new(transport: T, site: Arc<Site>, status: ServerStatus) -> Self {
        Self {
            transport,
            site,
            status,
            sessions: JoinSet::new(),
        }
    }

    /// Accepts on `listener` until an accept fails. The listener is
    /// released and the failure returned; the caller decides what's next.
    pub async fn serve<L: Accept>(&mut self, listener: L) -> io::Error {
        match listener.local_addr() {
            Ok(addr) => {
                info!("Listening on {}", addr);
                self.status.record_listening(addr.port()).await;
            }
            Err(e) => warn!(error = %e, "listening address unknown"),
        }

        loop {
            let event = tokio::select! {
                accepted = listener.accept() => Event::Accepted(accepted),
                Some(joined) = self.sessions.join_next() => Event::Finished(joined),
            };

            match event {
                Event::Accepted(Ok((socket, peer))) => {
                    debug!("Accepted connection from {}", peer);
                    self.status.record_peer(peer).await;
                    self.spawn_session(socket, peer);
                }
                Event::Accepted(Err(e)) => {
                    error!(error = %e, "could not accept socket");
                    return e;
                }
                Event::Finished(joined) => reap(joined),
            }
        }
    }

    fn spawn_session(&mut self, socket: TcpStream, peer: SocketAddr) {
        let transport = self.transport.clone();
        let site = Arc::clone(&self.site);
        self.sessions
            .spawn(session::serve(transport, socket, peer, site));
    }
}

fn reap(joined: std::result::Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "session task panicked");
        } else {
            debug!(error = %e, "session task cancelled");
        }
    }
}
