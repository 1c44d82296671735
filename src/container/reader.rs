use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::format::{FILE_HEADER_SIZE, FileHeader, Frame, Result};
use crate::payload::{BincodeCodec, PayloadCodec};

/// Reads frames from an in-memory GOBS file.
///
/// The header and the body checksum are checked when the reader is opened;
/// every frame is checked again against its own prefix before it is handed
/// out. The first failing frame ends iteration.
#[derive(Debug)]
pub struct GobsReader<C = BincodeCodec> {
    header: FileHeader,
    body: Bytes,
    offset: usize,
    frames: usize,
    failed: bool,
    codec: C,
}

impl GobsReader<BincodeCodec> {
    /// Open a file using the default bincode engine
    pub fn open(bytes: impl Into<Bytes>) -> Result<Self> {
        Self::open_with_codec(bytes, BincodeCodec)
    }
}

impl<C: PayloadCodec> GobsReader<C> {
    /// Open a file using `codec` for payloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is malformed or the body does not match
    /// the header checksum.
    pub fn open_with_codec(bytes: impl Into<Bytes>, codec: C) -> Result<Self> {
        let bytes = bytes.into();
        let header = FileHeader::from_bytes(&bytes)?;
        let body = bytes.slice(FILE_HEADER_SIZE..);
        header.verify(&body)?;

        debug!(
            version = header.version(),
            flags = %header.flags(),
            bytes = bytes.len(),
            "gobs file opened"
        );

        Ok(Self {
            header,
            body,
            offset: 0,
            frames: 0,
            failed: false,
            codec,
        })
    }

    /// Get file header
    #[must_use]
    pub const fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Number of frames read so far
    #[must_use]
    pub const fn frames_read(&self) -> usize {
        self.frames
    }

    /// Body bytes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.body.len() - self.offset
    }

    /// Read the next verified frame, or `None` at the end of the file
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.failed || self.remaining() == 0 {
            return Ok(None);
        }

        match Frame::decode(&self.body.slice(self.offset..)) {
            Ok((frame, consumed)) => {
                self.offset += consumed;
                self.frames += 1;
                Ok(Some(frame))
            }
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    /// Read the next frame and decode it into a value
    pub fn next_value<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_frame()? {
            Some(frame) => frame.decode_value(&self.codec).map(Some),
            None => Ok(None),
        }
    }
}

impl<C: PayloadCodec> Iterator for GobsReader<C> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

impl<C: PayloadCodec> std::iter::FusedIterator for GobsReader<C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{GobsWriter, Options};
    use crate::format::{Error, MAGIC, PREFIX_SIZE};

    #[test]
    fn test_roundtrip_values() {
        let mut writer = GobsWriter::new(Options::new().encrypted(true));
        writer.push(&"first").unwrap();
        writer.push(&vec![1u32, 2, 3]).unwrap();
        let file = writer.finish();

        let mut reader = GobsReader::open(file).unwrap();
        assert!(reader.header().flags().is_encrypted());

        let first: String = reader.next_value().unwrap().unwrap();
        let second: Vec<u32> = reader.next_value().unwrap().unwrap();
        assert_eq!(first, "first");
        assert_eq!(second, vec![1, 2, 3]);
        assert_eq!(reader.frames_read(), 2);
        assert!(reader.next_value::<String>().unwrap().is_none());
    }

    #[test]
    fn test_open_rejects_body_corruption() {
        let mut writer = GobsWriter::default();
        writer.push_raw(&b"payload"[..]).unwrap();
        let mut file = writer.finish().to_vec();
        let last = file.len() - 1;
        file[last] ^= 0x01;

        let result = GobsReader::open(file);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_open_rejects_bad_magic() {
        let mut file = GobsWriter::default().finish().to_vec();
        file[0] = b'G';

        let result = GobsReader::open(file);
        assert!(matches!(result, Err(Error::InvalidMagic { .. })));
    }

    #[test]
    fn test_truncated_body_stops_iteration() {
        let mut writer = GobsWriter::default();
        writer.push_raw(vec![9u8; 32]).unwrap();
        let full = writer.finish();

        // Cut the frame short and reseal so only the frame check can catch it.
        let body = full.slice(FILE_HEADER_SIZE..FILE_HEADER_SIZE + PREFIX_SIZE + 8);
        let header = FileHeader::from_bytes(&full).unwrap().seal(&body);
        let mut file = header.to_bytes().to_vec();
        file.extend_from_slice(&body);
        assert_eq!(&file[..4], &MAGIC);

        let mut reader = GobsReader::open(file).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(Error::TruncatedFrame {
                declared: 32,
                available: 8
            }))
        ));
        assert!(reader.next().is_none());
    }
}
