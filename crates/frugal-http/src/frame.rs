//! Wire constants and frame construction.
//!
//! Every payload on the wire is a frame: a 4-byte big-endian length field
//! followed by the payload bytes, base64-encoded into the HTTP body.
//!
//! ```text
//! base64([u32 BE: len][payload bytes])
//! ```
//!
//! The length field is carried for compatibility with multiplexed transports
//! that reuse this framing; it is not validated against the HTTP content
//! length. A frame holding only the 4-byte field (length 0, no payload) is
//! the oneway marker: "this call has no return value".

/// Length of the frame header in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Content type for framed RPC payloads, on both requests and responses.
pub const FRUGAL_CONTENT_TYPE: &str = "application/x-frugal";

/// Transfer encoding applied to every frame on the wire.
pub const BASE64_TRANSFER_ENCODING: &str = "base64";

/// Header through which a client advertises the largest response it accepts,
/// in decimal bytes. Absent or unparsable means unlimited.
pub const PAYLOAD_LIMIT_HEADER: &str = "x-frugal-payload-limit";

/// Prepend the 4-byte big-endian length field to `payload`.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}
