//! Framed RPC transport carried over HTTP.
//!
//! Two protocol-compatible components: [`HttpTransport`], a client that
//! sends one HTTP POST per RPC call, and [`HttpRpcServer`], a POST endpoint
//! that drives a [`Processor`] against inbound frames. Payloads travel as
//! base64-encoded frames (4-byte big-endian length prefix plus bytes); the
//! transport never looks past the prefix.
//!
//! Failure semantics live in [`TransportError`]: preflight request-size
//! enforcement, advertised response caps (HTTP 413), timeout mapping, and a
//! catch-all for everything else the HTTP layer reports.

pub mod client;
pub mod context;
pub mod error;
pub mod frame;
pub mod processor;
pub mod server;

pub use client::{HttpTransport, HttpTransportBuilder, Transport};
pub use context::{CallContext, DEFAULT_TIMEOUT};
pub use error::{Result, TransportError};
pub use frame::{
    frame, BASE64_TRANSFER_ENCODING, FRAME_HEADER_LEN, FRUGAL_CONTENT_TYPE, PAYLOAD_LIMIT_HEADER,
};
pub use processor::{CodecFactory, Processor, ProcessorError};
pub use server::{FrameHandler, HttpRpcServer, ServerHandle};
