use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use super::Options;
use crate::format::{FILE_HEADER_SIZE, Frame, Result};
use crate::payload::{BincodeCodec, PayloadCodec};

/// Builds a GOBS file in memory.
///
/// Frames are appended to the body as they are pushed; [`finish`](Self::finish)
/// seals the file header over the complete body and places it in front.
#[derive(Debug)]
pub struct GobsWriter<C = BincodeCodec> {
    options: Options,
    codec: C,
    body: BytesMut,
    frames: usize,
}

impl GobsWriter<BincodeCodec> {
    /// Create a writer using the default bincode engine
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_codec(options, BincodeCodec)
    }
}

impl<C: PayloadCodec> GobsWriter<C> {
    /// Create a writer using `codec` for payloads
    #[must_use]
    pub fn with_codec(options: Options, codec: C) -> Self {
        Self {
            options,
            codec,
            body: BytesMut::new(),
            frames: 0,
        }
    }

    /// Serialize `value` and append it as a frame
    #[instrument(level = "trace", skip_all, fields(codec = self.codec.name()))]
    pub fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let frame = Frame::from_value(value, &self.codec)?;
        self.push_frame(&frame);
        Ok(())
    }

    /// Append already-serialized payload bytes as a frame
    pub fn push_raw(&mut self, payload: impl Into<Bytes>) -> Result<()> {
        let frame = Frame::new(payload)?;
        self.push_frame(&frame);
        Ok(())
    }

    /// Append a prepared frame
    pub fn push_frame(&mut self, frame: &Frame) {
        frame.encode_into(&mut self.body);
        self.frames += 1;
        trace!(
            index = self.frames - 1,
            size = frame.prefix().size(),
            "frame appended"
        );
    }

    /// Number of frames written so far
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frames
    }

    /// Bytes written after the header so far
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Get options
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Seal the header and return the complete file
    #[must_use]
    pub fn finish(self) -> Bytes {
        let header = self.options.header().seal(&self.body);

        let mut file = BytesMut::with_capacity(FILE_HEADER_SIZE + self.body.len());
        file.put_slice(&header.to_bytes());
        file.put_slice(&self.body);

        debug!(
            frames = self.frames,
            bytes = file.len(),
            checksum = header.checksum(),
            flags = %header.flags(),
            "gobs file sealed"
        );

        file.freeze()
    }
}

impl Default for GobsWriter<BincodeCodec> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
