use anyhow::Context;
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::parser::{find_head_end, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::site::Site;
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 1024;

/// Serves exactly one request over `stream`, then closes it.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    site: Arc<Site>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

/// What reading the request head produced.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The first `n` bytes of the buffer hold the request head.
    Head(usize),
    /// The head did not fit in `max_request_bytes`.
    TooLarge,
    /// The peer closed before sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(site.max_request_bytes.min(4096)),
            state: ConnectionState::Reading,
            site,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let outcome = timeout(self.site.read_timeout, self.read_request_head())
                        .await
                        .context("timed out reading request")??;

                    self.state = match outcome {
                        ReadOutcome::Head(len) => {
                            ConnectionState::Processing(parse_request(&self.buffer[..len]))
                        }
                        ReadOutcome::TooLarge => {
                            tracing::warn!(
                                limit = self.site.max_request_bytes,
                                "Rejecting oversized request head"
                            );
                            ConnectionState::Writing(Response::bad_request())
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    tracing::debug!(
                        method = ?req.method,
                        path = ?req.path,
                        version = ?req.version,
                        host = ?req.headers.host,
                        user_agent = ?req.headers.user_agent,
                        content_type = ?req.headers.content_type,
                        "Parsed request"
                    );

                    let response = self.site.handle(&req).await;

                    tracing::info!(
                        method = req.method.as_deref().unwrap_or("-"),
                        path = req.path.as_deref().unwrap_or("-"),
                        status = response.status.as_u16(),
                        "Responding"
                    );

                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    let written = ResponseWriter::new(response)
                        .with_chunk_size(self.site.chunk_size)
                        .with_write_timeout(self.site.write_timeout)
                        .write_to(&mut self.stream)
                        .await?;

                    tracing::trace!(bytes = written, "Response written");

                    // No keep-alive: one response per connection.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }

        Ok(())
    }

    /// Reads until the head terminator arrives, the peer closes, or the
    /// buffer reaches `max_request_bytes`.
    ///
    /// A peer that closes mid-head still gets its partial head parsed.
    pub async fn read_request_head(&mut self) -> anyhow::Result<ReadOutcome> {
        let limit = self.site.max_request_bytes;

        loop {
            if let Some(end) = find_head_end(&self.buffer) {
                if end > limit {
                    return Ok(ReadOutcome::TooLarge);
                }
                return Ok(ReadOutcome::Head(end));
            }

            if self.buffer.len() >= limit {
                return Ok(ReadOutcome::TooLarge);
            }

            let mut temp = [0u8; READ_CHUNK];
            let n = self
                .stream
                .read(&mut temp)
                .await
                .context("failed to read request")?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                return Ok(ReadOutcome::Head(self.buffer.len().min(limit)));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
