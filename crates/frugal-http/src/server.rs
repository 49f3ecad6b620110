//! Server-side frame handler and HTTP server lifecycle.
//!
//! A reference implementation, not a production-hardened server: one POST
//! endpoint that decodes an inbound frame, drives the processor, and frames
//! the output back. Each request is handled independently; the only shared
//! state is the processor and codec factory, which must be safe for
//! concurrent use.

use crate::frame::{
    frame, BASE64_TRANSFER_ENCODING, FRAME_HEADER_LEN, FRUGAL_CONTENT_TYPE, PAYLOAD_LIMIT_HEADER,
};
use crate::processor::{CodecFactory, Processor, ProcessorError};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Per-request state: the processor and codec factory, bound once at server
/// construction and reused across all requests.
pub struct FrameHandler {
    processor: Arc<dyn Processor>,
    codec_factory: Arc<dyn CodecFactory>,
}

impl FrameHandler {
    pub fn new(processor: Arc<dyn Processor>, codec_factory: Arc<dyn CodecFactory>) -> Self {
        Self {
            processor,
            codec_factory,
        }
    }

    /// Drive the processor over one request payload (frame header already
    /// stripped) and collect the serialized response.
    ///
    /// An application error has already been written to the output stream by
    /// the processor itself, so it is swallowed here and the output forwarded
    /// unchanged. Any other processor failure aborts the request.
    fn run_processor(&self, request: &[u8]) -> Result<Vec<u8>, ProcessorError> {
        let mut response = Vec::new();
        {
            let mut input = self.codec_factory.input(request);
            let mut output = self.codec_factory.output(&mut response);
            match self.processor.process(&mut *input, &mut *output) {
                Ok(()) => {}
                Err(ProcessorError::Application(message)) => {
                    debug!("application error serialized into response: {}", message);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(response)
    }
}

/// POST endpoint: decode the inbound frame, process it, frame the output.
async fn handle_frame(
    State(handler): State<Arc<FrameHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match STANDARD.decode(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("request body was not valid base64: {}", err);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    // Absent or non-numeric limit header means unlimited.
    let response_limit = headers
        .get(PAYLOAD_LIMIT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);

    // Inbound frames must carry bytes past the header. A bare 4-byte frame
    // is only meaningful on responses (oneway marker); inbound it is a
    // protocol violation.
    if payload.len() <= FRAME_HEADER_LEN {
        warn!("invalid request frame length {}", payload.len());
        return StatusCode::BAD_REQUEST.into_response();
    }

    let response = match handler.run_processor(&payload[FRAME_HEADER_LEN..]) {
        Ok(response) => response,
        Err(err) => {
            error!("processor failed: {}", err);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if response_limit > 0 && response.len() > response_limit {
        debug!(
            "response of {} bytes exceeds advertised limit of {}",
            response.len(),
            response_limit
        );
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }

    let encoded = STANDARD.encode(frame(&response));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE.as_str(), FRUGAL_CONTENT_TYPE.to_string()),
            (header::CONTENT_LENGTH.as_str(), encoded.len().to_string()),
            (
                "content-transfer-encoding",
                BASE64_TRANSFER_ENCODING.to_string(),
            ),
        ],
        encoded,
    )
        .into_response()
}

/// Handle to a running server. Dropping stops the server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ServerHandle {
    /// Address the server is bound to (useful when serving on port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and shut the server down gracefully.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// HTTP server binding for a processor/codec pairing.
pub struct HttpRpcServer;

impl HttpRpcServer {
    /// Bind `addr` (port 0 picks a free port) and serve frames in background
    /// tasks until the returned handle is stopped or dropped.
    pub async fn serve(
        addr: SocketAddr,
        processor: Arc<dyn Processor>,
        codec_factory: Arc<dyn CodecFactory>,
    ) -> anyhow::Result<ServerHandle> {
        let handler = Arc::new(FrameHandler::new(processor, codec_factory));
        let app = Router::new()
            .route("/", post(handle_frame))
            .layer(TraceLayer::new_for_http())
            .with_state(handler);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        info!("frame server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("frame server error: {}", err);
            }
        });

        Ok(ServerHandle {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }
}
