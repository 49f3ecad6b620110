//! Client-side HTTP transport.
//!
//! "Stateless" in the sense that the transport is never persistently
//! connected: each RPC call is one HTTP POST and each response is one HTTP
//! response, so `open`/`close` are no-ops and `is_open` is always true. No
//! connection state is retained between calls and concurrent calls share no
//! mutable state.

use crate::context::CallContext;
use crate::error::{Result, TransportError};
use crate::frame::{
    BASE64_TRANSFER_ENCODING, FRAME_HEADER_LEN, FRUGAL_CONTENT_TYPE, PAYLOAD_LIMIT_HEADER,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Generic client transport capability: one framed payload out, one framed
/// payload (or nothing, for oneway calls) back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether the transport is usable. Connectionless transports always
    /// report true.
    fn is_open(&self) -> bool;

    /// Open the transport.
    async fn open(&self) -> Result<()>;

    /// Close the transport.
    async fn close(&self) -> Result<()>;

    /// Send a framed payload and return the response payload with its frame
    /// header stripped, or `None` for a oneway response.
    async fn request(&self, ctx: &CallContext, payload: &[u8]) -> Result<Option<Bytes>>;

    /// Send a framed payload and discard any response payload.
    async fn oneway(&self, ctx: &CallContext, payload: &[u8]) -> Result<()>;
}

/// HTTP implementation of [`Transport`].
///
/// The payload handed to [`request`](Transport::request) must already carry
/// its 4-byte length prefix; the caller's codec layer supplies it. The
/// transport base64-encodes the frame, POSTs it, and strips the prefix from
/// the decoded response.
pub struct HttpTransport {
    client: Client,
    url: String,
    request_size_limit: usize,
    response_size_limit: usize,
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    client: Option<Client>,
    url: String,
    request_size_limit: usize,
    response_size_limit: usize,
}

impl HttpTransportBuilder {
    /// Use a preconfigured HTTP client instead of a default one.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Cap outbound payloads at `limit` bytes. Zero means unlimited (the
    /// default). Oversized payloads fail before any network call.
    pub fn with_request_size_limit(mut self, limit: usize) -> Self {
        self.request_size_limit = limit;
        self
    }

    /// Advertise to the server that responses may be at most `limit` bytes,
    /// via the `x-frugal-payload-limit` header. Zero means unlimited (the
    /// default). The server enforces the limit after processing.
    pub fn with_response_size_limit(mut self, limit: usize) -> Self {
        self.response_size_limit = limit;
        self
    }

    pub fn build(self) -> HttpTransport {
        HttpTransport {
            client: self.client.unwrap_or_else(Client::new),
            url: self.url,
            request_size_limit: self.request_size_limit,
            response_size_limit: self.response_size_limit,
        }
    }
}

impl HttpTransport {
    /// Start building a transport that POSTs to `url`.
    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            client: None,
            url: url.into(),
            request_size_limit: 0,
            response_size_limit: 0,
        }
    }

    /// Target URL of this transport.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn preflight_check(&self, payload: &[u8]) -> Result<()> {
        if self.request_size_limit > 0 && payload.len() > self.request_size_limit {
            return Err(TransportError::RequestTooLarge {
                size: payload.len(),
                limit: self.request_size_limit,
            });
        }
        Ok(())
    }

    async fn make_request(&self, ctx: &CallContext, payload: &[u8]) -> Result<Vec<u8>> {
        let encoded = STANDARD.encode(payload);

        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, FRUGAL_CONTENT_TYPE)
            .header(ACCEPT, FRUGAL_CONTENT_TYPE)
            .header("content-transfer-encoding", BASE64_TRANSFER_ENCODING);
        if self.response_size_limit > 0 {
            request = request.header(PAYLOAD_LIMIT_HEADER, self.response_size_limit.to_string());
        }

        // From<reqwest::Error> maps timeouts to TimedOut, the rest to Unknown.
        let response = request
            .timeout(ctx.timeout)
            .body(encoded)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::PAYLOAD_TOO_LARGE {
                return Err(TransportError::ResponseTooLarge);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Unknown(format!(
                "response errored with code {} and body {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.bytes().await?;
        STANDARD
            .decode(&body)
            .map_err(|err| TransportError::Unknown(format!("response was not valid base64: {}", err)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn is_open(&self) -> bool {
        true
    }

    async fn open(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn request(&self, ctx: &CallContext, payload: &[u8]) -> Result<Option<Bytes>> {
        self.preflight_check(payload)?;

        let decoded = self.make_request(ctx, payload).await?;

        if decoded.len() < FRAME_HEADER_LEN {
            return Err(TransportError::Unknown("invalid frame size".to_string()));
        }
        if decoded.len() == FRAME_HEADER_LEN {
            // Bare frame header: oneway call, nothing to return.
            debug!("oneway response from {}", self.url);
            return Ok(None);
        }

        Ok(Some(Bytes::from(decoded).slice(FRAME_HEADER_LEN..)))
    }

    async fn oneway(&self, ctx: &CallContext, payload: &[u8]) -> Result<()> {
        // Oneway is detected via the response frame size, so the wire
        // behavior is identical to request; only the payload is dropped.
        self.request(ctx, payload).await.map(|_| ())
    }
}
