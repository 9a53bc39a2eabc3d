use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::http::parser::parse_request_target;
use crate::http::response::Response;
use crate::http::site::Site;
use crate::http::writer::ResponseWriter;

/// One secured client connection, good for exactly one request.
pub struct Connection<S> {
    stream: S,
    site: Arc<Site>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Option<String>),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>) -> Self {
        Self {
            stream,
            site,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to `Closed`. An error means the connection was
    /// dropped part way; whatever was written before stays written.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(buf) => ConnectionState::Processing(parse_request_target(&buf)),
                    None => {
                        debug!("client sent nothing, closing");
                        ConnectionState::Closed
                    }
                },

                ConnectionState::Processing(target) => {
                    let response = Response::for_resource(&self.site, target.as_deref()).await;
                    ConnectionState::Writing(response)
                }

                ConnectionState::Writing(response) => {
                    let sent = ResponseWriter::new(&response, &self.site)
                        .write_to_stream(&mut self.stream)
                        .await?;
                    match sent {
                        Some(bytes) => info!(
                            status = response.status.as_u16(),
                            resource = %response.name,
                            bytes,
                            "response sent"
                        ),
                        None => debug!(resource = %response.name, "empty response"),
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => {
                    // Best effort: the peer may already be gone.
                    let _ = self.stream.shutdown().await;
                    return Ok(());
                }
            };
        }
    }

    /// A single read of at most `max_request_bytes`. Anything beyond that
    /// is never looked at. `None` when the client sent nothing.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.site.max_request_bytes];
        let n = self.stream.read(&mut buf).await?;

        if n == 0 {
            return Ok(None);
        }

        buf.truncate(n);
        Ok(Some(buf))
    }
}
