use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tracing::debug;

use crate::http::connection::Connection;
use crate::http::site::Site;
use crate::tls::SecureTransport;

/// Handles one accepted socket from handshake to close.
///
/// Every failure stays inside this session: a failed handshake or read
/// closes the socket without a response.
pub async fn serve<T>(transport: T, socket: TcpStream, peer: SocketAddr, site: Arc<Site>)
where
    T: SecureTransport,
{
    let stream = match transport.handshake(socket).await {
        Ok(stream) => stream,
        Err(e) => {
            debug!(%peer, error = %e, "handshake failed");
            return;
        }
    };

    let mut conn = Connection::new(stream, site);
    if let Err(e) = conn.run().await {
        debug!(%peer, error = %e, "session ended early");
    }
}
