//! Collaborator interfaces consumed by the server handler.
//!
//! The transport never inspects payload contents beyond the 4-byte length
//! prefix; decoding and dispatch belong to the [`Processor`] and the
//! [`CodecFactory`]. Both are shared across simultaneously active requests,
//! so implementations must be safe for concurrent use.

use std::io::{Read, Write};
use thiserror::Error;

/// Failure modes of a [`Processor`].
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// An application-level error that the processor has already serialized
    /// into its output stream. The handler forwards the output unchanged so
    /// the client-side codec can surface the error to the RPC caller.
    #[error("application error: {0}")]
    Application(String),

    /// Any other failure. The handler aborts the request with HTTP 400.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// RPC dispatch component: reads a decoded request from the input stream and
/// writes the response (or a serialized application error) to the output
/// stream.
pub trait Processor: Send + Sync {
    fn process(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<(), ProcessorError>;
}

/// Produces codec readers and writers over raw byte streams.
///
/// The handler feeds the inbound payload (prefix already stripped) through
/// `input` and collects the processor's response through `output` over a
/// fresh buffer, one pair per request.
pub trait CodecFactory: Send + Sync {
    fn input<'a>(&self, payload: &'a [u8]) -> Box<dyn Read + Send + 'a>;
    fn output<'a>(&self, sink: &'a mut Vec<u8>) -> Box<dyn Write + Send + 'a>;
}
