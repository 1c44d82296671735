//! GOBS frame: prefix plus payload

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::metrics::{FrameDirection, Metrics};
use super::{FramePrefix, PREFIX_SIZE, Result};
use crate::payload::PayloadCodec;

/// One size/checksum/timestamp-prefixed payload unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    prefix: FramePrefix,
    payload: Bytes,
}

impl Frame {
    /// Create a frame for a payload, computing its prefix
    pub fn new(payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        let prefix = FramePrefix::build(&payload)?;
        Ok(Self { prefix, payload })
    }

    /// Encode a value with `codec` and frame the result
    pub fn from_value<T, C>(value: &T, codec: &C) -> Result<Self>
    where
        T: serde::Serialize + ?Sized,
        C: PayloadCodec,
    {
        Self::new(codec.encode(value)?)
    }

    /// Get prefix
    #[must_use]
    pub const fn prefix(&self) -> &FramePrefix {
        &self.prefix
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the frame, keeping only the verified payload
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Total encoded length (prefix + payload)
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        PREFIX_SIZE + self.payload.len()
    }

    /// Append the encoded frame to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_slice(&self.prefix.to_bytes());
        buf.put_slice(&self.payload);

        Metrics::record_frame(FrameDirection::Encoded, self.payload.len());
    }

    /// Encode frame to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.to_vec()
    }

    /// Decode one frame from the start of `bytes`.
    ///
    /// Returns the frame and the number of bytes it occupied. The payload is a
    /// zero-copy slice of `bytes` and has been checked against the prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than 16 bytes are available for the prefix
    /// - The size field is beyond the frame bound
    /// - Fewer payload bytes are available than declared
    /// - The payload checksum doesn't match
    pub fn decode(bytes: &Bytes) -> Result<(Self, usize)> {
        let prefix = FramePrefix::from_bytes(bytes)?;
        let body = &bytes[PREFIX_SIZE..];
        prefix.verify(body)?;

        let consumed = PREFIX_SIZE + prefix.payload_len();
        let payload = bytes.slice(PREFIX_SIZE..consumed);

        Metrics::record_frame(FrameDirection::Decoded, payload.len());
        trace!(size = prefix.size(), timestamp = prefix.timestamp(), "frame decoded");

        Ok((Self { prefix, payload }, consumed))
    }

    /// Decode the payload into a value with `codec`
    pub fn decode_value<T, C>(&self, codec: &C) -> Result<T>
    where
        T: DeserializeOwned,
        C: PayloadCodec,
    {
        codec.decode(&self.payload)
    }
}
