use anyhow::{Context, Result};
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Default size of each file read while streaming a body.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Serializes the status line, headers and the blank separator line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response onto a byte sink.
///
/// The body is written directly after the head; file bodies are streamed in
/// `chunk_size` pieces until EOF. The first failed or timed-out write aborts
/// the response, and the file handle is released when the writer is dropped.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
    chunk_size: usize,
    write_timeout: Option<Duration>,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
            chunk_size: DEFAULT_CHUNK_SIZE,
            write_timeout: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bounds every individual write, not the response as a whole.
    pub fn with_write_timeout(mut self, limit: Duration) -> Self {
        self.write_timeout = Some(limit);
        self
    }

    /// Sends the response and returns the number of bytes written.
    pub async fn write_to<W>(mut self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let head = std::mem::take(&mut self.head);
        self.write_bounded(sink, &head).await?;
        let mut written = head.len() as u64;

        match std::mem::replace(&mut self.body, Body::Empty) {
            Body::Empty => {}
            Body::Bytes(bytes) => {
                self.write_bounded(sink, &bytes).await?;
                written += bytes.len() as u64;
            }
            Body::File(mut file) => {
                let mut chunk = BytesMut::zeroed(self.chunk_size);

                loop {
                    let n = file
                        .read(&mut chunk[..])
                        .await
                        .context("failed to read file body")?;

                    if n == 0 {
                        break;
                    }

                    self.write_bounded(sink, &chunk[..n]).await?;
                    written += n as u64;
                }
            }
        }

        sink.flush().await.context("failed to flush response")?;
        Ok(written)
    }

    async fn write_bounded<W>(&self, sink: &mut W, data: &[u8]) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match self.write_timeout {
            Some(limit) => timeout(limit, sink.write_all(data))
                .await
                .context("write timed out")?
                .context("write failed")?,
            None => sink.write_all(data).await.context("write failed")?,
        }

        Ok(())
    }
}
