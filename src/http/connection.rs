use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::mime::ContentType;
use crate::http::parser::{find_header_end, parse_raw_request};
use crate::http::request::{ParsedRequest, RawRequest};
use crate::http::response::Response;
use crate::http::validator::{validate, ValidationOutcome};
use crate::http::writer::ResponseWriter;
use crate::site::{ResourceDescriptor, Site};

/// One client connection, serving exactly one request.
///
/// The connection owns its stream; [`Connection::run`] consumes the
/// connection, so the stream is shut down and dropped once on every path.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ConnectionState,
    site: Arc<Site>,
}

pub enum ConnectionState {
    AwaitingHeaders,
    Parsed(RawRequest),
    Resolving(ParsedRequest),
    Serving(ResponseWriter),
    Closed,
}

impl ConnectionState {
    fn name(&self) -> &'static str {
        match self {
            ConnectionState::AwaitingHeaders => "awaiting_headers",
            ConnectionState::Parsed(_) => "parsed",
            ConnectionState::Resolving(_) => "resolving",
            ConnectionState::Serving(_) => "serving",
            ConnectionState::Closed => "closed",
        }
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, site: Arc<Site>) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::AwaitingHeaders,
            site,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %e, "Stream shutdown failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            tracing::debug!(peer = %self.peer, state = state.name(), "Connection state");

            self.state = match state {
                ConnectionState::AwaitingHeaders => match self.read_request().await? {
                    Some(raw) => ConnectionState::Parsed(raw),
                    None => ConnectionState::Closed,
                },

                ConnectionState::Parsed(raw) => match validate(&raw) {
                    ValidationOutcome::Valid(request) => ConnectionState::Resolving(request),
                    ValidationOutcome::Malformed(reason) => {
                        tracing::warn!(peer = %self.peer, %reason, "Malformed request");
                        let body = self.site.templates.bad_request().await;
                        ConnectionState::Serving(ResponseWriter::new(&Response::bad_request(body)))
                    }
                },

                ConnectionState::Resolving(request) => {
                    let response = self.respond(&request).await;

                    tracing::info!(
                        peer = %self.peer,
                        method = request.method.as_str(),
                        target = %request.target,
                        status = response.status.as_u16(),
                        "Request served"
                    );

                    ConnectionState::Serving(ResponseWriter::new(&response))
                }

                ConnectionState::Serving(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Reads the header block, or `None` if the client timed out.
    async fn read_request(&mut self) -> anyhow::Result<Option<RawRequest>> {
        let Some(limit) = self.site.header_timeout else {
            return self.read_header_block().await.map(Some);
        };

        match tokio::time::timeout(limit, self.read_header_block()).await {
            Ok(result) => result.map(Some),
            Err(_) => {
                tracing::warn!(
                    peer = %self.peer,
                    timeout_secs = limit.as_secs(),
                    "Timed out waiting for request headers"
                );
                Ok(None)
            }
        }
    }

    async fn read_header_block(&mut self) -> anyhow::Result<RawRequest> {
        loop {
            if let Some(end) = find_header_end(&self.buffer) {
                return Ok(parse_raw_request(&self.buffer[..end]));
            }

            // Oversized blocks are handed on unterminated and fail validation
            if self.buffer.len() > self.site.max_header_bytes {
                tracing::warn!(
                    peer = %self.peer,
                    bytes = self.buffer.len(),
                    "Request header block too large"
                );
                return Ok(parse_raw_request(&self.buffer));
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client closed; whatever arrived is the request
                return Ok(parse_raw_request(&self.buffer));
            }
        }
    }

    async fn respond(&self, request: &ParsedRequest) -> Response {
        let descriptor = self.site.resolver.resolve(&request.target);
        let path = self.site.local_file(&descriptor);

        if is_regular_file(&path).await {
            return self.serve_resource(&path, &descriptor).await;
        }

        let url = format!(
            "http://{}{}",
            request.host().unwrap_or_default(),
            request.target_without_trailing_slash()
        );

        match self.site.redirects.lookup(descriptor.content_type, &url) {
            Some(location) => {
                let body = self.site.templates.moved_permanently().await;
                Response::moved_permanently(location, body)
            }
            None => Response::not_found(self.site.templates.not_found().await),
        }
    }

    async fn serve_resource(&self, path: &Path, descriptor: &ResourceDescriptor) -> Response {
        match tokio::fs::read(path).await {
            Ok(bytes) => match descriptor.content_type {
                ContentType::Html => Response::ok_html(&bytes),
                ContentType::Image => Response::ok_image(bytes),
            },
            Err(e) => {
                tracing::error!(
                    peer = %self.peer,
                    path = %path.display(),
                    error = %e,
                    "Failed to read resource"
                );
                Response::internal_error()
            }
        }
    }
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}
