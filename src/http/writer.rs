use std::io::SeekFrom;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::mime::MimeResolver;
use crate::http::response::{Response, StatusCode};
use crate::http::site::Site;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Builds the status line and header block.
///
/// `length` is the size of the body about to be streamed. It is not
/// written: responses carry no `Content-Length` and end when the
/// connection closes.
pub fn construct_header(status: StatusCode, length: u64, mime_type: &str) -> String {
    debug!(status = status.as_u16(), length, mime_type, "constructing header");

    format!(
        "{} {} {}\r\nContent-Type: {}\r\n\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase(),
        mime_type
    )
}

/// Streams a [`Response`] to the client: header first, then the file in
/// fixed-size chunks.
pub struct ResponseWriter<'a> {
    response: &'a Response,
    mime: &'a MimeResolver,
    chunk_size: usize,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response, site: &'a Site) -> Self {
        Self {
            response,
            mime: &site.mime,
            chunk_size: site.chunk_size.max(1),
        }
    }

    /// Returns the number of body bytes written, or `None` when the file
    /// could no longer be opened, in which case nothing was written at all.
    pub async fn write_to_stream<S>(&self, stream: &mut S) -> anyhow::Result<Option<u64>>
    where
        S: AsyncWrite + Unpin,
    {
        let mut file = match File::open(&self.response.path).await {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    file = %self.response.path.display(),
                    error = %e,
                    "file disappeared before it could be sent"
                );
                return Ok(None);
            }
        };

        let length = file.seek(SeekFrom::End(0)).await?;
        file.rewind().await?;

        let mime = self.mime.resolve(&self.response.name).await;
        let header = construct_header(self.response.status, length, &mime);
        stream.write_all(header.as_bytes()).await?;

        let mut chunk = vec![0u8; self.chunk_size];
        let mut sent = 0u64;
        loop {
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }

            if let Err(e) = stream.write_all(&chunk[..n]).await {
                debug!(error = %e, sent, "write failed, abandoning body");
                break;
            }
            sent += n as u64;
        }

        stream.flush().await?;
        Ok(Some(sent))
    }
}
